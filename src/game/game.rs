use uuid::Uuid;

use crate::env::{DiceSubsystem, LoggingAnimator, SimulatedDice};
use crate::game::players::{PieceId, PlayerSetup, PlayerState};
use crate::game::{GameConfig, GameError, GameSession, StepOutcome, TurnPhase};
use crate::players::BasePlayer;

pub const TURNS_LIMIT: u32 = 1000;

/// Headless driver: one session wired to simulated dice and a logging
/// renderer. Seat `i` picks piece `i`, and a seat's policy is looked up by
/// piece so a guest inherits the policy of the seat they took over.
pub struct Game {
    pub seed: u64,
    pub id: Uuid,
    pub session: GameSession,
    pub dice: SimulatedDice,
    pub animator: LoggingAnimator,
    guests: u32,
}

impl Game {
    pub fn new(config: GameConfig, num_players: usize) -> Result<Self, GameError> {
        let setups: Vec<PlayerSetup> = (0..num_players)
            .map(|i| PlayerSetup::new(format!("Player {}", i + 1), i as PieceId))
            .collect();
        Self::with_setups(config, &setups)
    }

    pub fn with_setups(config: GameConfig, setups: &[PlayerSetup]) -> Result<Self, GameError> {
        let seed = config.seed;
        let mut session = GameSession::new(config)?;
        let mut animator = LoggingAnimator::default();
        session.start_game(setups, &mut animator)?;
        Ok(Self {
            seed,
            id: Uuid::new_v4(),
            session,
            dice: SimulatedDice::new(seed.wrapping_add(1)),
            animator,
            guests: 0,
        })
    }

    pub fn with_dice(mut self, dice: SimulatedDice) -> Self {
        self.dice = dice;
        self
    }

    pub fn play<P: BasePlayer>(&mut self, players: &[P]) -> Option<String> {
        while !self.session.is_finished() && self.session.turns_played < TURNS_LIMIT {
            if self.play_tick(players).is_none() {
                break;
            }
        }
        self.winner().map(str::to_string)
    }

    /// Advances the session by one input: open a turn, throw, or deliver
    /// whatever the dice reported. `None` once nothing can move.
    pub fn play_tick<P: BasePlayer>(&mut self, players: &[P]) -> Option<StepOutcome> {
        if players.is_empty() {
            return None;
        }
        match self.session.phase() {
            TurnPhase::Idle => self.session.begin_turn(),
            TurnPhase::AwaitingRoll { player, .. } => {
                let state = self.session.roster().get(player)?;
                let policy = &players[usize::from(state.piece_id) % players.len()];
                let gesture = policy.gesture(self, state);
                self.session
                    .request_roll(gesture, &mut self.dice)
                    .map(|_| StepOutcome::default())
            }
            TurnPhase::Rolling { .. } => {
                let mut outcome = StepOutcome::default();
                let mut reported = false;
                while let Some(batch) = self.dice.poll_stopped() {
                    reported = true;
                    let step = self.session.on_all_dice_stopped(
                        batch.roll_id,
                        &batch.outcomes,
                        &mut self.animator,
                    );
                    outcome.events.extend(step.events);
                    outcome.done |= step.done;
                }
                if !reported {
                    log::warn!("dice never reported for game {}", self.id);
                    return None;
                }
                Some(outcome)
            }
            _ => None,
        }
    }

    /// Swaps the trailing player for a fresh guest on the same piece.
    pub fn rotate_seat(&mut self) -> Result<Option<PlayerState>, GameError> {
        if self.session.roster().len() < 2 {
            return Ok(None);
        }
        let Some(leaving) = self.session.roster().trailer().map(|p| p.name.clone()) else {
            return Ok(None);
        };
        let removed = self.session.remove_player(&leaving)?;
        self.guests += 1;
        let name = format!("Guest {}", self.guests);
        let joined = self
            .session
            .add_player(&name, removed.piece_id, &mut self.animator)?;
        log::debug!("{leaving} handed piece {} to {name}", removed.piece_id);
        Ok(Some(joined))
    }

    pub fn winner(&self) -> Option<&str> {
        self.session.winner()
    }

    pub fn winning_piece(&self) -> Option<PieceId> {
        let winner = self.winner()?;
        self.session.roster().get(winner).map(|p| p.piece_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::players::SteadyPlayer;

    #[test]
    fn seeded_games_reach_the_goal() {
        let config = GameConfig {
            board_length: 20,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, 3).unwrap();
        let winner = game.play(&[SteadyPlayer::default()]);
        assert!(winner.is_some());
        assert!(game.session.is_finished());
        assert_eq!(game.session.ranking()[0].name, winner.unwrap());
    }

    #[test]
    fn echoed_stop_reports_do_not_double_move() {
        let config = GameConfig {
            board_length: 30,
            shuffle_turn_order: false,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, 2)
            .unwrap()
            .with_dice(SimulatedDice::new(5).with_echo(true).with_drop_chance(0.0));
        let players = [SteadyPlayer::default()];
        game.play_tick(&players);
        game.play_tick(&players);
        let outcome = game.play_tick(&players).unwrap();
        let settled = outcome
            .events
            .iter()
            .filter(|e| matches!(e, crate::game::GameEvent::DiceSettled { .. }))
            .count();
        assert_eq!(settled, 1);
    }

    #[test]
    fn rotating_a_seat_keeps_the_piece() {
        let mut game = Game::new(GameConfig::default(), 3).unwrap();
        let guest = game.rotate_seat().unwrap().unwrap();
        assert_eq!(guest.name, "Guest 1");
        assert_eq!(game.session.roster().len(), 3);
        assert!(guest.piece_id < 3);
    }
}
