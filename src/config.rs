//! Client settings and their defaults

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{ClientError, ClientResult};

// How long each hand-result line stays on the board
pub const DEFAULT_WINNER_DISPLAY_MS: u64 = 3000;
// Hold after the status is cleared at the end of a result sequence
pub const DEFAULT_CLEAR_DELAY_MS: u64 = 0;

pub const WINNER_DISPLAY_ENV: &str = "MERLION_WINNER_DISPLAY_MS";
pub const CLEAR_DELAY_ENV: &str = "MERLION_CLEAR_DELAY_MS";
pub const SEQUENCE_POLICY_ENV: &str = "MERLION_SEQUENCE_POLICY";

/// What the notifier does with a sequence that arrives while another is still playing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequencePolicy {
    /// Play it after the running one finishes.
    #[default]
    Queue,
    /// Drop what is left of the running one and start the new one now.
    Preempt,
}

impl FromStr for SequencePolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(SequencePolicy::Queue),
            "preempt" => Ok(SequencePolicy::Preempt),
            other => Err(ClientError::malformed(format!(
                "unknown sequence policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub winner_display_ms: u64,
    pub clear_delay_ms: u64,
    pub sequence_policy: SequencePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            winner_display_ms: DEFAULT_WINNER_DISPLAY_MS,
            clear_delay_ms: DEFAULT_CLEAR_DELAY_MS,
            sequence_policy: SequencePolicy::Queue,
        }
    }
}

impl ClientConfig {
    pub fn from_json(text: &str) -> ClientResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Defaults overridden by `MERLION_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Values that don't parse are logged and skipped.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(WINNER_DISPLAY_ENV) {
            match raw.trim().parse() {
                Ok(ms) => self.winner_display_ms = ms,
                Err(_) => log::warn!("⚠️  Ignoring {}={:?}: not a number", WINNER_DISPLAY_ENV, raw),
            }
        }
        if let Some(raw) = lookup(CLEAR_DELAY_ENV) {
            match raw.trim().parse() {
                Ok(ms) => self.clear_delay_ms = ms,
                Err(_) => log::warn!("⚠️  Ignoring {}={:?}: not a number", CLEAR_DELAY_ENV, raw),
            }
        }
        if let Some(raw) = lookup(SEQUENCE_POLICY_ENV) {
            match raw.parse() {
                Ok(policy) => self.sequence_policy = policy,
                Err(err) => log::warn!("⚠️  Ignoring {}: {}", SEQUENCE_POLICY_ENV, err),
            }
        }
        self
    }

    pub fn winner_display(&self) -> Duration {
        Duration::from_millis(self.winner_display_ms)
    }

    pub fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms)
    }
}
