use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::players::{PieceId, PlayerState};
use super::turn::TurnCycle;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("no player named {0}")]
    UnknownPlayer(String),
    #[error("a player named {0} already exists")]
    DuplicateName(String),
    #[error("piece {0} is already in use")]
    PieceTaken(PieceId),
}

/// Every live player plus the turn order over them.
///
/// Add and remove keep the two in lockstep: every name in the turn order has
/// a player and every player has exactly one seat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRoster {
    players: Vec<PlayerState>,
    turns: TurnCycle,
    next_slot: u32,
}

impl PlayerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    pub fn turn_order(&self) -> &[String] {
        self.turns.order()
    }

    pub fn turn_pointer(&self) -> usize {
        self.turns.pointer()
    }

    pub fn get(&self, name: &str) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerState> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn piece_in_use(&self, piece_id: PieceId) -> bool {
        self.players.iter().any(|p| p.piece_id == piece_id)
    }

    /// Seats a player on the start cell at the back of the turn order.
    pub fn seat(&mut self, name: &str, piece_id: PieceId) -> Result<&PlayerState, RosterError> {
        self.insert(name, piece_id, 0)
    }

    /// Mid-game join: the newcomer lands somewhere between the trailer and
    /// the leader, inclusive, or on the start cell if nobody is playing.
    pub fn add_player(
        &mut self,
        name: &str,
        piece_id: PieceId,
        rng: &mut impl Rng,
    ) -> Result<&PlayerState, RosterError> {
        let position = match (self.trailer(), self.leader()) {
            (Some(trailer), Some(leader)) => rng.gen_range(trailer.position..=leader.position),
            _ => 0,
        };
        self.insert(name, piece_id, position)
    }

    fn insert(
        &mut self,
        name: &str,
        piece_id: PieceId,
        position: usize,
    ) -> Result<&PlayerState, RosterError> {
        if self.contains(name) {
            return Err(RosterError::DuplicateName(name.to_string()));
        }
        if self.piece_in_use(piece_id) {
            return Err(RosterError::PieceTaken(piece_id));
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.players
            .push(PlayerState::new(name, piece_id, slot).with_position(position));
        self.turns.push(name);
        log::debug!("seated {name} at cell {position} with turn slot {slot}");
        let idx = self.players.len() - 1;
        Ok(&self.players[idx])
    }

    pub fn remove_player(&mut self, name: &str) -> Result<PlayerState, RosterError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| RosterError::UnknownPlayer(name.to_string()))?;
        let removed = self.players.remove(idx);
        self.turns.remove(name);
        Ok(removed)
    }

    pub fn current_name(&mut self) -> Option<String> {
        let players = &self.players;
        self.turns
            .current(|name| players.iter().any(|p| p.name == name))
            .map(str::to_string)
    }

    pub fn current_player(&mut self) -> Option<&PlayerState> {
        let name = self.current_name()?;
        self.get(&name)
    }

    /// Hands the turn to the next seat.
    ///
    /// The departing player's dice bonus was already spent by the roll that
    /// used it; grants earned during this turn carry over to their next roll.
    pub fn advance_turn(&mut self) {
        if self.current_name().is_some() {
            self.turns.advance();
        }
    }

    /// Furthest along; ties go to the earliest turn slot.
    pub fn leader(&self) -> Option<&PlayerState> {
        self.players.iter().max_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| b.turn_slot.cmp(&a.turn_slot))
        })
    }

    /// Furthest behind; ties go to the earliest turn slot.
    pub fn trailer(&self) -> Option<&PlayerState> {
        self.players.iter().min_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.turn_slot.cmp(&b.turn_slot))
        })
    }

    pub fn next_of(&self, name: &str) -> Option<&PlayerState> {
        self.turns.next_after(name).and_then(|n| self.get(n))
    }

    pub fn previous_of(&self, name: &str) -> Option<&PlayerState> {
        self.turns.previous_before(name).and_then(|n| self.get(n))
    }

    /// Finished players first, then by position, then by turn slot.
    pub fn ranking(&self, board_length: usize) -> Vec<&PlayerState> {
        let mut ranked: Vec<&PlayerState> = self.players.iter().collect();
        ranked.sort_by(|a, b| rank_order(a, b, board_length));
        ranked
    }
}

fn rank_order(a: &PlayerState, b: &PlayerState, board_length: usize) -> Ordering {
    b.is_finished(board_length)
        .cmp(&a.is_finished(board_length))
        .then_with(|| b.position.cmp(&a.position))
        .then_with(|| a.turn_slot.cmp(&b.turn_slot))
}
