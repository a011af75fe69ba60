use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error, Serialize, PartialEq)]
pub enum ClientError {
    // Payload errors: the push is rejected and nothing is mutated
    #[error("Malformed payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("Unknown event '{name}'")]
    UnknownEvent { name: String },

    // State errors: the push referenced something this table doesn't have
    #[error("Seat {seat} is not at the table ({roster_len} seated)")]
    UnknownSeat { seat: usize, roster_len: usize },

    #[error("No hero seat assigned")]
    NoHero,

    #[error("No active table")]
    NoActiveTable,

    // Transport errors
    #[error("Failed to send command: {reason}")]
    SendFailed { reason: String },

    #[error("Notifier is no longer running")]
    NotifierClosed,
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Payload,
    State,
    Transport,
}

impl ClientError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ClientError::MalformedPayload { .. } | ClientError::UnknownEvent { .. } => {
                ErrorCategory::Payload
            }

            ClientError::UnknownSeat { .. } | ClientError::NoHero | ClientError::NoActiveTable => {
                ErrorCategory::State
            }

            ClientError::SendFailed { .. } | ClientError::NotifierClosed => {
                ErrorCategory::Transport
            }
        }
    }

    /// Rejected pushes and dead channels are worth a log line. A hero action
    /// before any table is known is just the user clicking early.
    pub fn should_log(&self) -> bool {
        !matches!(self, ClientError::NoActiveTable)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            ClientError::MalformedPayload { .. } => "MalformedPayload",
            ClientError::UnknownEvent { .. } => "UnknownEvent",
            ClientError::UnknownSeat { .. } => "UnknownSeat",
            ClientError::NoHero => "NoHero",
            ClientError::NoActiveTable => "NoActiveTable",
            ClientError::SendFailed { .. } => "SendFailed",
            ClientError::NotifierClosed => "NotifierClosed",
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        ClientError::MalformedPayload {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::malformed(err.to_string())
    }
}
