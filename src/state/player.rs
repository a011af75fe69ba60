use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::state::board::{set_if_changed, BoardState};

/// Cards arrive either as one string (`"AhKd"`) or as a list (`["Ah", "Kd"]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CardsRepr {
    Joined(String),
    Listed(Vec<String>),
}

impl From<CardsRepr> for Vec<String> {
    fn from(repr: CardsRepr) -> Self {
        match repr {
            CardsRepr::Joined(joined) => split_cards(&joined),
            CardsRepr::Listed(cards) => cards,
        }
    }
}

fn split_cards(joined: &str) -> Vec<String> {
    let chars: Vec<char> = joined.chars().filter(|c| !c.is_whitespace()).collect();
    chars.chunks(2).map(|card| card.iter().collect()).collect()
}

fn de_cards<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CardsRepr>::deserialize(deserializer)?
        .map(Vec::from)
        .unwrap_or_default())
}

fn de_optional_cards<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<CardsRepr>::deserialize(deserializer)?.map(Vec::from))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub seat: usize,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "de_cards")]
    pub cards: Vec<String>,
    #[serde(default)]
    pub folded: bool,
    #[serde(default)]
    pub last_action: String,
    #[serde(default)]
    pub put_in: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A partial player push (`last_player`, hole cards). Absent keys are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        deserialize_with = "de_optional_cards",
        skip_serializing_if = "Option::is_none"
    )]
    pub cards: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub put_in: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerField {
    Name,
    Cards,
    Folded,
    LastAction,
    PutIn,
    Extra(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Changed {
        seat: usize,
        fields: Vec<PlayerField>,
    },
    Destroyed {
        seat: usize,
    },
}

/// What a renderer needs for one seat: the record plus the board-derived flags.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub record: PlayerRecord,
    pub to_act: bool,
    pub is_dealer: bool,
}

impl fmt::Display for PlayerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seat {}: {} (put in: {}, folded: {})",
            self.seat, self.name, self.put_in, self.folded
        )
    }
}

impl PlayerRecord {
    pub fn new(seat: usize, name: &str) -> Self {
        Self {
            seat,
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn to_act(&self, board: &BoardState) -> bool {
        board.current_player == Some(self.seat)
    }

    pub fn is_dealer(&self, board: &BoardState) -> bool {
        board.dealer == Some(self.seat)
    }

    /// A `fold` action counts as folded even before the server sets the flag.
    pub fn has_folded(&self) -> bool {
        self.folded || self.last_action == "fold"
    }

    pub fn view(&self, board: &BoardState) -> PlayerView {
        PlayerView {
            record: PlayerRecord {
                folded: self.has_folded(),
                ..self.clone()
            },
            to_act: self.to_act(board),
            is_dealer: self.is_dealer(board),
        }
    }

    /// Merges a partial push. The seat is never rewritten.
    pub fn merge(&mut self, update: PlayerUpdate) -> Vec<PlayerField> {
        let mut changed = Vec::new();

        if let Some(name) = update.name {
            if set_if_changed(&mut self.name, name) {
                changed.push(PlayerField::Name);
            }
        }
        if let Some(cards) = update.cards {
            if set_if_changed(&mut self.cards, cards) {
                changed.push(PlayerField::Cards);
            }
        }
        if let Some(folded) = update.folded {
            if set_if_changed(&mut self.folded, folded) {
                changed.push(PlayerField::Folded);
            }
        }
        if let Some(last_action) = update.last_action {
            if set_if_changed(&mut self.last_action, last_action) {
                changed.push(PlayerField::LastAction);
            }
        }
        // A fold sticks for the rest of the hand, even once betting state resets
        if self.last_action == "fold" && !self.folded {
            self.folded = true;
            changed.push(PlayerField::Folded);
        }
        if let Some(put_in) = update.put_in {
            if set_if_changed(&mut self.put_in, put_in) {
                changed.push(PlayerField::PutIn);
            }
        }
        for (key, value) in update.extra {
            if self.extra.get(&key) != Some(&value) {
                self.extra.insert(key.clone(), value);
                changed.push(PlayerField::Extra(key));
            }
        }

        changed
    }

    /// Clears per-round betting state; folds and cards survive until the next hand.
    pub fn reset_round(&mut self) -> Vec<PlayerField> {
        self.merge(PlayerUpdate {
            last_action: Some(String::new()),
            put_in: Some(0),
            ..PlayerUpdate::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_missing_keys() {
        let player: PlayerRecord =
            serde_json::from_value(json!({"seat": 3, "name": "Gino", "stack": 200})).unwrap();

        assert_eq!(player.seat, 3);
        assert!(player.cards.is_empty());
        assert!(!player.folded);
        assert_eq!(player.last_action, "");
        assert_eq!(player.put_in, 0);
        assert_eq!(player.extra.get("stack"), Some(&json!(200)));
    }

    #[test]
    fn test_cards_from_string_or_list() {
        let joined: PlayerUpdate = serde_json::from_value(json!({"cards": "AhKd"})).unwrap();
        let listed: PlayerUpdate = serde_json::from_value(json!({"cards": ["Ah", "Kd"]})).unwrap();
        let empty: PlayerRecord = serde_json::from_value(json!({"seat": 0, "cards": ""})).unwrap();

        assert_eq!(joined.cards, Some(vec!["Ah".to_string(), "Kd".to_string()]));
        assert_eq!(joined.cards, listed.cards);
        assert!(empty.cards.is_empty());
    }

    #[test]
    fn test_derived_flags_follow_board() {
        let player = PlayerRecord::new(1, "Fabrizio");
        let board = BoardState {
            dealer: Some(1),
            current_player: Some(0),
            ..BoardState::default()
        };

        let view = player.view(&board);
        assert!(view.is_dealer);
        assert!(!view.to_act);

        let rendered = serde_json::to_value(&view).unwrap();
        assert_eq!(rendered["name"], json!("Fabrizio"));
        assert_eq!(rendered["is_dealer"], json!(true));
    }

    #[test]
    fn test_fold_action_marks_folded() {
        let mut player = PlayerRecord::new(0, "Alice");

        let changed = player.merge(PlayerUpdate {
            last_action: Some("fold".to_string()),
            ..PlayerUpdate::default()
        });

        assert_eq!(changed, vec![PlayerField::LastAction, PlayerField::Folded]);
        assert!(player.folded);
        player.reset_round();
        assert!(player.view(&BoardState::default()).record.folded);
    }

    #[test]
    fn test_view_treats_fold_action_as_folded() {
        let snapshot: PlayerRecord =
            serde_json::from_value(json!({"seat": 1, "name": "Bob", "last_action": "fold"}))
                .unwrap();
        let calling = PlayerRecord {
            last_action: "call".to_string(),
            ..PlayerRecord::new(2, "Carol")
        };

        assert!(!snapshot.folded);
        assert!(snapshot.view(&BoardState::default()).record.folded);
        assert!(!calling.view(&BoardState::default()).record.folded);
    }

    #[test]
    fn test_reset_round_leaves_folded_and_cards() {
        let mut player = PlayerRecord {
            cards: vec!["Qs".to_string(), "Qd".to_string()],
            folded: true,
            last_action: "fold".to_string(),
            put_in: 40,
            ..PlayerRecord::new(2, "Alice")
        };

        let changed = player.reset_round();

        assert_eq!(changed, vec![PlayerField::LastAction, PlayerField::PutIn]);
        assert!(player.folded);
        assert_eq!(player.cards.len(), 2);
        assert!(player.reset_round().is_empty());
    }
}
