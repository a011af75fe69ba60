use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Table identifier as the server sends it: sometimes a number, sometimes a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableId {
    Number(u64),
    Name(String),
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableId::Number(id) => write!(f, "{}", id),
            TableId::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<u64> for TableId {
    fn from(id: u64) -> Self {
        TableId::Number(id)
    }
}

impl From<&str> for TableId {
    fn from(name: &str) -> Self {
        TableId::Name(name.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardState {
    pub status: String,
    pub table_id: Option<TableId>,
    pub dealer: Option<usize>,
    pub current_player: Option<usize>,
    /// Board keys this client has no typed field for (pot, stage, community cards).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The board portion of a server push. Absent keys leave the board alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<TableId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_player: Option<usize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardUpdate {
    pub fn status(message: impl Into<String>) -> Self {
        Self {
            status: Some(message.into()),
            ..Self::default()
        }
    }

    /// Seats this update points at, for validation against the roster.
    pub fn referenced_seats(&self) -> impl Iterator<Item = usize> {
        self.dealer.into_iter().chain(self.current_player)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardField {
    Status,
    TableId,
    Dealer,
    CurrentPlayer,
    Extra(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    Changed(Vec<BoardField>),
    /// A new hand has a dealer; renderers move the dealer button.
    DealerSet,
}

pub(crate) fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl BoardState {
    /// Merges every key present in `update` and reports which fields moved.
    pub fn merge(&mut self, update: BoardUpdate) -> Vec<BoardField> {
        let mut changed = Vec::new();

        if let Some(status) = update.status {
            if set_if_changed(&mut self.status, status) {
                changed.push(BoardField::Status);
            }
        }
        if let Some(table_id) = update.table_id {
            if set_if_changed(&mut self.table_id, Some(table_id)) {
                changed.push(BoardField::TableId);
            }
        }
        if let Some(dealer) = update.dealer {
            if set_if_changed(&mut self.dealer, Some(dealer)) {
                changed.push(BoardField::Dealer);
            }
        }
        if let Some(current_player) = update.current_player {
            if set_if_changed(&mut self.current_player, Some(current_player)) {
                changed.push(BoardField::CurrentPlayer);
            }
        }
        for (key, value) in update.extra {
            if self.extra.get(&key) != Some(&value) {
                self.extra.insert(key.clone(), value);
                changed.push(BoardField::Extra(key));
            }
        }

        changed
    }

    /// Drops dealer and current-player seats that fall outside a roster of
    /// `roster_len` players.
    pub fn clear_seats_from(&mut self, roster_len: usize) -> Vec<BoardField> {
        let mut changed = Vec::new();

        if self.dealer.is_some_and(|seat| seat >= roster_len) {
            self.dealer = None;
            changed.push(BoardField::Dealer);
        }
        if self.current_player.is_some_and(|seat| seat >= roster_len) {
            self.current_player = None;
            changed.push(BoardField::CurrentPlayer);
        }

        changed
    }
}
