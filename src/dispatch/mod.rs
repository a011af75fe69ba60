pub mod events;
pub mod handler;

pub use events::{decode_event, encode_event, ServerEvent};
pub use handler::EventHandler;
