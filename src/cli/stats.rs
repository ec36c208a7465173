use std::collections::HashMap;
use std::time::Duration;

use crate::game::game::Game;
use crate::game::players::PieceId;

#[derive(Debug, Default, Clone)]
pub struct GameStats {
    pub wins: HashMap<PieceId, u32>,
    pub scores_by_piece: HashMap<PieceId, Vec<u32>>,
    pub games: u32,
    pub unfinished: u32,
    pub total_turns: u64,
    pub total_rolls: u64,
    pub dropped_dice: u64,
    pub total_duration: Duration,
}

impl GameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_game(&mut self, game: &Game, duration: Duration) {
        self.games += 1;
        self.total_duration += duration;
        self.total_turns += u64::from(game.session.turns_played);
        self.total_rolls += u64::from(game.session.rolls);
        self.dropped_dice += game.dice.dropped();

        match game.winning_piece() {
            Some(piece) => *self.wins.entry(piece).or_insert(0) += 1,
            None => self.unfinished += 1,
        }

        for player in game.session.roster().players() {
            self.scores_by_piece
                .entry(player.piece_id)
                .or_default()
                .push(player.score_units);
        }
    }

    fn per_game(&self, total: u64) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        total as f64 / self.games as f64
    }

    pub fn get_avg_turns(&self) -> f64 {
        self.per_game(self.total_turns)
    }

    pub fn get_avg_rolls(&self) -> f64 {
        self.per_game(self.total_rolls)
    }

    pub fn get_avg_score(&self, piece: PieceId) -> f64 {
        self.scores_by_piece
            .get(&piece)
            .filter(|scores| !scores.is_empty())
            .map(|scores| scores.iter().sum::<u32>() as f64 / scores.len() as f64)
            .unwrap_or(0.0)
    }

    pub fn get_avg_duration(&self) -> Duration {
        if self.games == 0 {
            return Duration::ZERO;
        }
        self.total_duration / self.games
    }
}

#[derive(Default)]
pub struct StatisticsAccumulator {
    pub stats: GameStats,
}

impl StatisticsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, game: &Game, duration: Duration) {
        self.stats.record_game(game, duration);
    }
}
