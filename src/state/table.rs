use crate::errors::{ClientError, ClientResult};
use crate::state::board::{BoardEvent, BoardState, BoardUpdate};
use crate::state::observed::{Listeners, Observed, SubscriptionId};
use crate::state::player::{PlayerEvent, PlayerRecord, PlayerUpdate, PlayerView};
use crate::state::roster::Roster;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    /// Every earlier record is gone; these seats are new records to bind to.
    Replaced { seats: Vec<usize> },
    RoundReset,
    HeroAssigned { seat: usize },
}

/// Client-side mirror of one table: board, roster and which seat is ours.
#[derive(Debug, Default)]
pub struct Table {
    board: Observed<BoardState, BoardEvent>,
    roster: Roster,
    roster_listeners: Listeners<Roster, RosterEvent>,
    hero_seat: Option<usize>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    // Queries

    pub fn board(&self) -> &BoardState {
        self.board.get()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn player(&self, seat: usize) -> Option<&PlayerRecord> {
        self.roster.at(seat)
    }

    pub fn hero_seat(&self) -> Option<usize> {
        self.hero_seat
    }

    pub fn hero(&self) -> Option<&PlayerRecord> {
        self.hero_seat.and_then(|seat| self.roster.at(seat))
    }

    pub fn current_player(&self) -> Option<&PlayerRecord> {
        self.board()
            .current_player
            .and_then(|seat| self.roster.at(seat))
    }

    pub fn player_views(&self) -> Vec<PlayerView> {
        let board = self.board.get();
        self.roster.iter().map(|player| player.view(board)).collect()
    }

    // Subscriptions

    pub fn subscribe_board<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&BoardState, &BoardEvent) + Send + 'static,
    {
        self.board.subscribe(listener)
    }

    pub fn unsubscribe_board(&mut self, id: SubscriptionId) -> bool {
        self.board.unsubscribe(id)
    }

    pub fn subscribe_player<F>(&mut self, seat: usize, listener: F) -> ClientResult<SubscriptionId>
    where
        F: FnMut(&PlayerRecord, &PlayerEvent) + Send + 'static,
    {
        self.roster.subscribe(seat, listener)
    }

    pub fn unsubscribe_player(&mut self, seat: usize, id: SubscriptionId) -> bool {
        self.roster.unsubscribe(seat, id)
    }

    pub fn subscribe_roster<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Roster, &RosterEvent) + Send + 'static,
    {
        self.roster_listeners.subscribe(listener)
    }

    pub fn unsubscribe_roster(&mut self, id: SubscriptionId) -> bool {
        self.roster_listeners.unsubscribe(id)
    }

    // Mutations

    /// Board seat references must land inside a seated roster. An empty roster
    /// (nobody joined yet) accepts anything.
    fn check_board_refs(update: &BoardUpdate, roster_len: usize) -> ClientResult<()> {
        if roster_len == 0 {
            return Ok(());
        }
        match update.referenced_seats().find(|seat| *seat >= roster_len) {
            Some(seat) => Err(ClientError::UnknownSeat { seat, roster_len }),
            None => Ok(()),
        }
    }

    pub fn apply_board_update(&mut self, update: BoardUpdate) -> ClientResult<()> {
        Self::check_board_refs(&update, self.roster.len())?;
        self.merge_board(update);
        Ok(())
    }

    fn merge_board(&mut self, update: BoardUpdate) {
        self.board.update(|board| {
            let fields = board.merge(update);
            (!fields.is_empty()).then_some(BoardEvent::Changed(fields))
        });
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.merge_board(BoardUpdate::status(message));
    }

    pub fn signal_dealer(&mut self) {
        self.board.emit(&BoardEvent::DealerSet);
    }

    /// Merges `update` and then drops board seats the current roster no longer has.
    fn merge_board_for_roster(&mut self, update: BoardUpdate) {
        let roster_len = self.roster.len();
        self.board.update(|board| {
            let mut fields = board.merge(update);
            for field in board.clear_seats_from(roster_len) {
                if !fields.contains(&field) {
                    fields.push(field);
                }
            }
            (!fields.is_empty()).then_some(BoardEvent::Changed(fields))
        });
    }

    fn swap_roster(&mut self, players: Vec<PlayerRecord>) -> ClientResult<()> {
        let seats = self.roster.replace(players)?;
        self.hero_seat = None;
        self.roster_listeners
            .notify(&self.roster, &RosterEvent::Replaced { seats });
        Ok(())
    }

    pub fn replace_roster(&mut self, players: Vec<PlayerRecord>) -> ClientResult<()> {
        self.swap_roster(players)?;
        self.merge_board_for_roster(BoardUpdate::default());
        Ok(())
    }

    /// Replaces the roster and merges the board as one step. Everything is
    /// validated against the incoming roster before anything is touched.
    pub fn apply_snapshot(
        &mut self,
        board: BoardUpdate,
        players: Vec<PlayerRecord>,
        hero_seat: Option<usize>,
    ) -> ClientResult<()> {
        Roster::validate(&players)?;
        Self::check_board_refs(&board, players.len())?;
        if let Some(seat) = hero_seat {
            if seat >= players.len() {
                return Err(ClientError::UnknownSeat {
                    seat,
                    roster_len: players.len(),
                });
            }
        }

        self.swap_roster(players)?;
        self.merge_board_for_roster(board);
        if let Some(seat) = hero_seat {
            self.assign_hero(seat)?;
        }
        Ok(())
    }

    pub fn update_seat(&mut self, seat: usize, update: PlayerUpdate) -> ClientResult<()> {
        self.roster.update(seat, update)
    }

    /// Board delta plus the player who just acted, applied together or not at all.
    pub fn apply_turn(&mut self, board: BoardUpdate, last_player: PlayerUpdate) -> ClientResult<()> {
        let seat = last_player
            .seat
            .ok_or_else(|| ClientError::malformed("last_player has no seat"))?;
        self.roster.check_seat(seat)?;
        Self::check_board_refs(&board, self.roster.len())?;

        self.merge_board(board);
        self.roster.update(seat, last_player)
    }

    pub fn reset_round_state(&mut self) {
        self.roster.reset_round();
        self.roster_listeners
            .notify(&self.roster, &RosterEvent::RoundReset);
    }

    pub fn assign_hero(&mut self, seat: usize) -> ClientResult<()> {
        self.roster.check_seat(seat)?;
        self.hero_seat = Some(seat);
        self.roster_listeners
            .notify(&self.roster, &RosterEvent::HeroAssigned { seat });
        Ok(())
    }

    /// Private data for our own seat only.
    pub fn apply_hole_cards(&mut self, update: PlayerUpdate) -> ClientResult<()> {
        let seat = self.hero_seat.ok_or(ClientError::NoHero)?;
        self.roster.update(seat, update)
    }
}
