use std::fmt;
use tokio::sync::mpsc;

use crate::errors::{ClientError, ClientResult};
use crate::state::TableId;

/// Commands the client sends upstream. On the wire each is `"<verb> <table_id>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Join,
    Fold,
    Call,
    Raise,
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Join => "join",
            Command::Fold => "fold",
            Command::Call => "call",
            Command::Raise => "raise",
        }
    }

    pub fn wire(&self, table_id: &TableId) -> String {
        format!("{} {}", self.verb(), table_id)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

pub fn send_command(
    sender: &mpsc::UnboundedSender<String>,
    command: Command,
    table_id: &TableId,
) -> ClientResult<()> {
    let message = command.wire(table_id);
    log::debug!("📤 Sending command: {}", message);
    sender
        .send(message)
        .map_err(|e| ClientError::SendFailed {
            reason: e.to_string(),
        })
}
