use crate::config::ClientConfig;
use crate::dispatch::events::{HandResult, ServerEvent, Winner};
use crate::errors::{ClientError, ClientResult};
use crate::notifier::{Notice, Sequence};
use crate::state::{PlayerRecord, Table};

/// Routes server events into the table mirror. Anything that has to be shown
/// over time comes back as a notice sequence for the notifier.
pub struct EventHandler<'a> {
    config: &'a ClientConfig,
}

impl<'a> EventHandler<'a> {
    pub fn new(config: &'a ClientConfig) -> Self {
        Self { config }
    }

    pub fn handle_event(
        &self,
        event: ServerEvent,
        table: &mut Table,
    ) -> ClientResult<Option<Sequence<Table>>> {
        match event {
            ServerEvent::Join(snapshot) => {
                table.apply_snapshot(snapshot.board, snapshot.players, None)?;
                log::info!("🪑 Joined table with {} players", table.roster().len());
                Ok(None)
            }
            ServerEvent::HandStarted(start) => {
                table.apply_snapshot(
                    start.snapshot.board,
                    start.snapshot.players,
                    Some(start.hero_seat),
                )?;
                table.signal_dealer();
                log::info!("🃏 Hand started, hero in seat {}", start.hero_seat);
                Ok(None)
            }
            ServerEvent::StateChanged(turn) => {
                table.apply_turn(turn.board, turn.last_player)?;
                Ok(None)
            }
            ServerEvent::StageChanged(board) => {
                table.apply_board_update(board)?;
                table.reset_round_state();
                Ok(None)
            }
            ServerEvent::HandFinished(result) => self.winner_sequence(result, table).map(Some),
            ServerEvent::HoleCards(cards) => {
                table.apply_hole_cards(cards)?;
                Ok(None)
            }
            ServerEvent::StatusMsg(status) => {
                table.set_status(status.message);
                Ok(None)
            }
        }
    }

    /// One notice per winner, each held for the winner display time, then a
    /// notice that clears the status line.
    fn winner_sequence(&self, result: HandResult, table: &Table) -> ClientResult<Sequence<Table>> {
        let mut sequence = Vec::with_capacity(result.winners.len() + 1);

        for winner in &result.winners {
            let player = table.player(winner.seat).ok_or(ClientError::UnknownSeat {
                seat: winner.seat,
                roster_len: table.roster().len(),
            })?;
            let message = winner_message(player, winner);
            log::info!("🏆 {}", message);
            sequence.push(Notice::new(
                move |table: &mut Table| table.set_status(message),
                self.config.winner_display(),
            ));
        }

        sequence.push(Notice::new(
            |table: &mut Table| table.set_status(""),
            self.config.clear_delay(),
        ));
        Ok(sequence)
    }
}

pub fn winner_message(player: &PlayerRecord, winner: &Winner) -> String {
    format!(
        "{} wins ${} with {} ({})",
        player.name,
        winner.amount,
        winner.cards.concat(),
        winner.description
    )
}
