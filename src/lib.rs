pub mod client;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod notifier;
pub mod state;


// Re-export commonly used items for convenience
pub use client::TableClient;
pub use config::{ClientConfig, SequencePolicy};
pub use errors::{ClientError, ClientResult};
pub use state::{BoardState, PlayerRecord, Table, TableId};
