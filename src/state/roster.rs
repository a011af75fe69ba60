use crate::errors::{ClientError, ClientResult};
use crate::state::observed::{Observed, SubscriptionId};
use crate::state::player::{PlayerEvent, PlayerRecord, PlayerUpdate};

pub type ObservedPlayer = Observed<PlayerRecord, PlayerEvent>;

/// Players at the table, indexed by seat. Seats are always `0..len`.
#[derive(Debug, Default)]
pub struct Roster {
    seats: Vec<ObservedPlayer>,
}

impl Roster {
    pub fn new() -> Self {
        Self { seats: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn at(&self, seat: usize) -> Option<&PlayerRecord> {
        self.seats.get(seat).map(Observed::get)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.seats.iter().map(Observed::get)
    }

    pub fn check_seat(&self, seat: usize) -> ClientResult<()> {
        if seat < self.seats.len() {
            Ok(())
        } else {
            Err(ClientError::UnknownSeat {
                seat,
                roster_len: self.seats.len(),
            })
        }
    }

    /// Seats must be unique and dense: exactly `0..players.len()` in any order.
    pub fn validate(players: &[PlayerRecord]) -> ClientResult<()> {
        let mut taken = vec![false; players.len()];
        for player in players {
            match taken.get_mut(player.seat) {
                None => {
                    return Err(ClientError::malformed(format!(
                        "seat {} outside 0..{}",
                        player.seat,
                        players.len()
                    )))
                }
                Some(true) => {
                    return Err(ClientError::malformed(format!(
                        "seat {} listed twice",
                        player.seat
                    )))
                }
                Some(slot) => *slot = true,
            }
        }
        Ok(())
    }

    /// Destroys every current record, then seats `players` in seat order.
    /// Returns the new seat list.
    pub fn replace(&mut self, mut players: Vec<PlayerRecord>) -> ClientResult<Vec<usize>> {
        Self::validate(&players)?;

        for observed in self.seats.drain(..) {
            let seat = observed.get().seat;
            observed.destroy(PlayerEvent::Destroyed { seat });
        }

        players.sort_by_key(|player| player.seat);
        self.seats = players.into_iter().map(Observed::new).collect();
        Ok((0..self.seats.len()).collect())
    }

    pub fn subscribe<F>(&mut self, seat: usize, listener: F) -> ClientResult<SubscriptionId>
    where
        F: FnMut(&PlayerRecord, &PlayerEvent) + Send + 'static,
    {
        self.check_seat(seat)?;
        Ok(self.seats[seat].subscribe(listener))
    }

    pub fn unsubscribe(&mut self, seat: usize, id: SubscriptionId) -> bool {
        self.seats
            .get_mut(seat)
            .is_some_and(|observed| observed.unsubscribe(id))
    }

    pub fn listener_count(&self, seat: usize) -> usize {
        self.seats.get(seat).map_or(0, Observed::listener_count)
    }

    /// Merges `update` into the record at `seat`; prior state is intact on error.
    pub fn update(&mut self, seat: usize, update: PlayerUpdate) -> ClientResult<()> {
        self.check_seat(seat)?;
        if let Some(claimed) = update.seat {
            if claimed != seat {
                return Err(ClientError::malformed(format!(
                    "update for seat {} addressed to seat {}",
                    claimed, seat
                )));
            }
        }

        self.seats[seat].update(|player| {
            let fields = player.merge(update);
            (!fields.is_empty()).then_some(PlayerEvent::Changed { seat, fields })
        });
        Ok(())
    }

    pub fn reset_round(&mut self) {
        for (seat, observed) in self.seats.iter_mut().enumerate() {
            observed.update(|player| {
                let fields = player.reset_round();
                (!fields.is_empty()).then_some(PlayerEvent::Changed { seat, fields })
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players(names: &[&str]) -> Vec<PlayerRecord> {
        names
            .iter()
            .enumerate()
            .map(|(seat, name)| PlayerRecord::new(seat, name))
            .collect()
    }

    #[test]
    fn test_replace_sorts_by_seat() {
        let mut roster = Roster::new();
        let mut shuffled = players(&["Alice", "Bob", "Carol"]);
        shuffled.reverse();

        let seats = roster.replace(shuffled).unwrap();

        assert_eq!(seats, vec![0, 1, 2]);
        let names: Vec<&str> = roster.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_validate_rejects_gaps_and_duplicates() {
        let gap = vec![PlayerRecord::new(0, "Alice"), PlayerRecord::new(2, "Bob")];
        let twice = vec![PlayerRecord::new(1, "Alice"), PlayerRecord::new(1, "Bob")];

        assert!(matches!(
            Roster::validate(&gap),
            Err(ClientError::MalformedPayload { .. })
        ));
        assert!(matches!(
            Roster::validate(&twice),
            Err(ClientError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn test_failed_replace_keeps_old_roster() {
        let mut roster = Roster::new();
        roster.replace(players(&["Alice", "Bob"])).unwrap();

        let result = roster.replace(vec![PlayerRecord::new(5, "Mallory")]);

        assert!(result.is_err());
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.at(1).unwrap().name, "Bob");
    }

    #[test]
    fn test_update_unknown_seat() {
        let mut roster = Roster::new();
        roster.replace(players(&["Alice"])).unwrap();

        let result = roster.update(
            4,
            PlayerUpdate {
                put_in: Some(10),
                ..PlayerUpdate::default()
            },
        );

        assert_eq!(
            result,
            Err(ClientError::UnknownSeat {
                seat: 4,
                roster_len: 1
            })
        );
    }

    #[test]
    fn test_update_with_mismatched_seat_is_rejected() {
        let mut roster = Roster::new();
        roster.replace(players(&["Alice", "Bob"])).unwrap();

        let result = roster.update(
            0,
            PlayerUpdate {
                seat: Some(1),
                put_in: Some(10),
                ..PlayerUpdate::default()
            },
        );

        assert!(matches!(result, Err(ClientError::MalformedPayload { .. })));
        assert_eq!(roster.at(0).unwrap().put_in, 0);
    }
}
