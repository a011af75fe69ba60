use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ClientError, ClientResult};
use crate::state::player::CardsRepr;
use crate::state::{BoardUpdate, PlayerRecord, PlayerUpdate};

/// Full board and roster, sent when we join a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub board: BoardUpdate,
    pub players: Vec<PlayerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandStart {
    #[serde(flatten)]
    pub snapshot: Snapshot,
    pub hero_seat: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnUpdate {
    #[serde(flatten)]
    pub board: BoardUpdate,
    pub last_player: PlayerUpdate,
}

/// One showdown winner. On the wire: `[seat, amount, [cards], description]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "(usize, u64, CardsRepr, String)",
    into = "(usize, u64, Vec<String>, String)"
)]
pub struct Winner {
    pub seat: usize,
    pub amount: u64,
    pub cards: Vec<String>,
    pub description: String,
}

impl From<(usize, u64, CardsRepr, String)> for Winner {
    fn from((seat, amount, cards, description): (usize, u64, CardsRepr, String)) -> Self {
        Self {
            seat,
            amount,
            cards: cards.into(),
            description,
        }
    }
}

impl From<Winner> for (usize, u64, Vec<String>, String) {
    fn from(winner: Winner) -> Self {
        (winner.seat, winner.amount, winner.cards, winner.description)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub winners: Vec<Winner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Join(Snapshot),
    HandStarted(HandStart),
    StateChanged(TurnUpdate),
    StageChanged(BoardUpdate),
    HandFinished(HandResult),
    HoleCards(PlayerUpdate),
    StatusMsg(StatusMessage),
}

impl ServerEvent {
    pub const NAMES: [&'static str; 7] = [
        "join",
        "hand_started",
        "state_changed",
        "stage_changed",
        "hand_finished",
        "hole_cards",
        "status_msg",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Join(_) => "join",
            ServerEvent::HandStarted(_) => "hand_started",
            ServerEvent::StateChanged(_) => "state_changed",
            ServerEvent::StageChanged(_) => "stage_changed",
            ServerEvent::HandFinished(_) => "hand_finished",
            ServerEvent::HoleCards(_) => "hole_cards",
            ServerEvent::StatusMsg(_) => "status_msg",
        }
    }
}

/// Decodes `{"event": "<name>", "data": {...}}`. Unrecognised names are
/// reported as such rather than as a decoding failure.
pub fn decode_event(text: &str) -> ClientResult<ServerEvent> {
    let value: Value = serde_json::from_str(text)?;
    let name = value
        .get("event")
        .and_then(Value::as_str)
        .ok_or_else(|| ClientError::malformed("missing event name"))?;

    if !ServerEvent::NAMES.contains(&name) {
        return Err(ClientError::UnknownEvent {
            name: name.to_string(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

pub fn encode_event(event: &ServerEvent) -> ClientResult<String> {
    Ok(serde_json::to_string(event)?)
}
