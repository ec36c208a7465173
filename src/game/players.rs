use serde::{Deserialize, Serialize};

pub type PieceId = u8;

pub const BASE_MULTIPLIER: u32 = 1;

/// What the UI hands over for each seat: a name and a chosen token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub name: String,
    pub piece_id: Option<PieceId>,
}

impl PlayerSetup {
    pub fn new(name: impl Into<String>, piece_id: PieceId) -> Self {
        Self {
            name: name.into(),
            piece_id: Some(piece_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub piece_id: PieceId,
    pub position: usize,
    pub turn_slot: u32,
    /// Extra dice for the next movement roll.
    pub dice_bonus: u32,
    pub effect_multiplier: u32,
    pub score_units: u32,
}

impl PlayerState {
    pub fn new(name: impl Into<String>, piece_id: PieceId, turn_slot: u32) -> Self {
        Self {
            name: name.into(),
            piece_id,
            position: 0,
            turn_slot,
            dice_bonus: 0,
            effect_multiplier: BASE_MULTIPLIER,
            score_units: 0,
        }
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = position;
        self
    }

    pub fn is_finished(&self, board_length: usize) -> bool {
        self.position >= board_length
    }

    /// Dice thrown on the next movement roll.
    pub fn dice_count(&self) -> u32 {
        1 + self.dice_bonus
    }

    /// Hands the pending bonus to the roll being started.
    pub fn spend_dice_bonus(&mut self) -> u32 {
        std::mem::take(&mut self.dice_bonus)
    }

    pub fn double_multiplier(&mut self, cap: u32) -> u32 {
        self.effect_multiplier = self.effect_multiplier.saturating_mul(2).min(cap.max(1));
        self.effect_multiplier
    }

    pub fn reset_multiplier(&mut self) {
        self.effect_multiplier = BASE_MULTIPLIER;
    }

    pub fn add_score(&mut self, units: u32) {
        self.score_units = self.score_units.saturating_add(units);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_stages_stop_at_cap() {
        let mut player = PlayerState::new("a", 0, 0);
        let stages: Vec<u32> = (0..6).map(|_| player.double_multiplier(16)).collect();
        assert_eq!(stages, vec![2, 4, 8, 16, 16, 16]);
        player.reset_multiplier();
        assert_eq!(player.effect_multiplier, 1);
    }

    #[test]
    fn spending_the_bonus_clears_it() {
        let mut player = PlayerState::new("a", 0, 0);
        player.dice_bonus = 2;
        assert_eq!(player.dice_count(), 3);
        assert_eq!(player.spend_dice_bonus(), 2);
        assert_eq!(player.dice_count(), 1);
    }
}
