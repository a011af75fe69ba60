pub mod board;
pub mod observed;
pub mod player;
pub mod roster;
pub mod table;

pub use board::{BoardEvent, BoardField, BoardState, BoardUpdate, TableId};
pub use observed::{Listener, Listeners, Observed, SubscriptionId};
pub use player::{PlayerEvent, PlayerField, PlayerRecord, PlayerUpdate, PlayerView};
pub use roster::Roster;
pub use table::{RosterEvent, Table};
