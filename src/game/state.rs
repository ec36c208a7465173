use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, BoardError},
    coords::{DEFAULT_STEP_SPEED, TraversalPlan},
    env::{BoardAnimator, DiceSubsystem},
    types::{EventKind, PoolProfile},
};

use super::{
    dice::{DiceBatch, DiceOutcomes, DiceTotal, DieOutcome, RollGesture, RollRequest},
    events::{
        AppliedEffect, EventContext, EventResolution, PendingScore, apply_scoring_roll,
        resolve_event,
    },
    movement::{MoveResult, move_player},
    players::{PieceId, PlayerSetup, PlayerState},
    roster::{PlayerRoster, RosterError},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_length: usize,
    pub min_players: usize,
    pub max_players: usize,
    /// Distinct tokens on offer; piece ids run `0..piece_count`.
    pub piece_count: PieceId,
    pub profile: PoolProfile,
    pub multiplier_cap: u32,
    pub shuffle_turn_order: bool,
    pub seed: u64,
    /// Token pacing in px per ms.
    pub step_speed: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_length: 50,
            min_players: 2,
            max_players: 6,
            piece_count: 10,
            profile: PoolProfile::Enhanced,
            multiplier_cap: 16,
            shuffle_turn_order: true,
            seed: 42,
            step_speed: DEFAULT_STEP_SPEED,
        }
    }
}

impl GameConfig {
    /// Parses overrides on top of the defaults and validates the result.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.board_length < 1 {
            return Err(BoardError::Degenerate {
                board_length: self.board_length,
            }
            .into());
        }
        if self.min_players == 0 || self.min_players > self.max_players {
            return Err(GameError::InvalidConfig("player bounds are inverted or empty"));
        }
        if usize::from(self.piece_count) < self.max_players {
            return Err(GameError::InvalidConfig("fewer pieces than seats"));
        }
        if self.multiplier_cap == 0 {
            return Err(GameError::InvalidConfig("multiplier cap must be positive"));
        }
        if !(self.step_speed.is_finite() && self.step_speed > 0.0) {
            return Err(GameError::InvalidConfig("step speed must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Roster(#[from] RosterError),
    #[error("could not read config: {0}")]
    ConfigFormat(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("{count} players joined but between {min} and {max} are needed")]
    InvalidPlayerCount {
        count: usize,
        min: usize,
        max: usize,
    },
    #[error("{0} has not picked a piece")]
    PieceNotSelected(String),
    #[error("piece {piece} does not exist (only {count} pieces)")]
    PieceOutOfRange { piece: PieceId, count: PieceId },
    #[error("two players are named {0}")]
    DuplicateName(String),
    #[error("piece {0} was picked twice")]
    DuplicatePiece(PieceId),
    #[error("every seat is taken ({0} players)")]
    RosterFull(usize),
    #[error("game already started")]
    AlreadyStarted,
    #[error("game has not started")]
    NotStarted,
    #[error("game already completed")]
    GameFinished,
}

/// What the dice currently in the bowl are for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollPurpose {
    Movement,
    Scoring(PendingScore),
}

#[derive(Debug, Clone, PartialEq, strum::IntoStaticStr)]
pub enum TurnPhase {
    NotStarted,
    Idle,
    AwaitingRoll {
        player: String,
        purpose: RollPurpose,
    },
    Rolling {
        request: RollRequest,
        batch: DiceBatch,
        purpose: RollPurpose,
    },
    ResolvingMovement {
        player: String,
        total: DiceTotal,
    },
    ResolvingEvent {
        player: String,
        event: Option<EventKind>,
    },
    TurnEnd {
        player: String,
    },
    Completed {
        winner: String,
    },
}

impl TurnPhase {
    /// Player who owns the turn in progress, if any.
    pub fn active_player(&self) -> Option<&str> {
        match self {
            TurnPhase::AwaitingRoll { player, .. }
            | TurnPhase::ResolvingMovement { player, .. }
            | TurnPhase::ResolvingEvent { player, .. }
            | TurnPhase::TurnEnd { player } => Some(player),
            TurnPhase::Rolling { request, .. } => Some(&request.player),
            TurnPhase::NotStarted | TurnPhase::Idle | TurnPhase::Completed { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted {
        turn_order: Vec<String>,
        board_length: usize,
    },
    TurnBegan {
        player: String,
        dice_count: u32,
    },
    DiceSettled {
        roll_id: u64,
        outcomes: DiceOutcomes,
        total: DiceTotal,
    },
    Moved(MoveResult),
    EventResolved(EventResolution),
    ScoringRollSettled {
        target: String,
        outcome: DieOutcome,
        units: Option<u32>,
    },
    TurnAdvanced {
        next_player: Option<String>,
    },
    GameWon {
        winner: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub events: Vec<GameEvent>,
    pub done: bool,
}

/// One game: board, roster and the turn state machine.
///
/// Every operation runs to completion before the next input is accepted.
/// Input that arrives in the wrong phase is rejected, never queued.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    board: Board,
    plan: TraversalPlan,
    roster: PlayerRoster,
    phase: TurnPhase,
    next_roll_id: u64,
    pub turns_played: u32,
    pub rolls: u32,
    rng: StdRng,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let board = Board::generate(config.board_length, config.profile, &mut rng)?;
        Ok(Self::assemble(config, board, rng))
    }

    /// Session over a prebuilt board; `config.board_length` follows the board.
    pub fn with_board(mut config: GameConfig, board: Board) -> Result<Self, GameError> {
        config.board_length = board.board_length();
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, board, rng))
    }

    fn assemble(config: GameConfig, board: Board, rng: StdRng) -> Self {
        Self {
            config,
            board,
            plan: TraversalPlan::default(),
            roster: PlayerRoster::new(),
            phase: TurnPhase::NotStarted,
            next_roll_id: 0,
            turns_played: 0,
            rolls: 0,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn plan(&self) -> &TraversalPlan {
        &self.plan
    }

    pub fn roster(&self) -> &PlayerRoster {
        &self.roster
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::Completed { .. })
    }

    pub fn winner(&self) -> Option<&str> {
        match &self.phase {
            TurnPhase::Completed { winner } => Some(winner),
            _ => None,
        }
    }

    /// The roll the session is waiting on, if the dice are out.
    pub fn pending_roll(&self) -> Option<&RollRequest> {
        match &self.phase {
            TurnPhase::Rolling { request, .. } => Some(request),
            _ => None,
        }
    }

    pub fn current_player(&mut self) -> Option<&PlayerState> {
        self.roster.current_player()
    }

    pub fn ranking(&self) -> Vec<&PlayerState> {
        self.roster.ranking(self.board.board_length())
    }

    /// Seats the initial players and fires the start cell for each of them.
    pub fn start_game(
        &mut self,
        setups: &[PlayerSetup],
        animator: &mut dyn BoardAnimator,
    ) -> Result<StepOutcome, GameError> {
        if !matches!(self.phase, TurnPhase::NotStarted) {
            return Err(GameError::AlreadyStarted);
        }
        let mut seats = self.validate_setups(setups)?;
        if self.config.shuffle_turn_order {
            seats.shuffle(&mut self.rng);
        }

        let mut roster = PlayerRoster::new();
        for (name, piece) in &seats {
            roster.seat(name, *piece)?;
        }
        self.roster = roster;
        let segments = animator.traversal_segments(&self.board);
        self.plan = TraversalPlan::from_segments(&segments, self.config.step_speed);
        if self.plan.len() < self.board.board_length() {
            log::warn!(
                "renderer supplied {} segments for {} steps",
                self.plan.len(),
                self.board.board_length()
            );
        }
        for (name, _) in &seats {
            animator.place_token_on_cell(name, 0);
        }

        let turn_order = self.roster.turn_order().to_vec();
        log::info!(
            "game started: {} players on a {}-step board, order {:?}",
            turn_order.len(),
            self.board.board_length(),
            turn_order
        );
        let mut outcome = StepOutcome::default();
        outcome.events.push(GameEvent::GameStarted {
            turn_order: turn_order.clone(),
            board_length: self.board.board_length(),
        });
        self.transition(TurnPhase::Idle);

        if let Some(event) = self.board.event_at(0) {
            for name in &turn_order {
                let mut ctx = EventContext {
                    board: &self.board,
                    plan: &self.plan,
                    animator: &mut *animator,
                    multiplier_cap: self.config.multiplier_cap,
                };
                let resolution = resolve_event(event, name, &mut self.roster, &mut ctx)?;
                outcome.events.push(GameEvent::EventResolved(resolution));
            }
        }
        Ok(outcome)
    }

    fn validate_setups(&self, setups: &[PlayerSetup]) -> Result<Vec<(String, PieceId)>, GameError> {
        let (min, max) = (self.config.min_players, self.config.max_players);
        if !(min..=max).contains(&setups.len()) {
            return Err(GameError::InvalidPlayerCount {
                count: setups.len(),
                min,
                max,
            });
        }
        let mut seats = Vec::with_capacity(setups.len());
        for (idx, setup) in setups.iter().enumerate() {
            let name = match setup.name.trim() {
                "" => format!("Player {}", idx + 1),
                trimmed => trimmed.to_string(),
            };
            let piece = setup
                .piece_id
                .ok_or_else(|| GameError::PieceNotSelected(name.clone()))?;
            self.check_piece(piece)?;
            seats.push((name, piece));
        }
        if let Some(name) = seats.iter().map(|(name, _)| name).duplicates().next() {
            return Err(GameError::DuplicateName(name.clone()));
        }
        if let Some(piece) = seats.iter().map(|(_, piece)| *piece).duplicates().next() {
            return Err(GameError::DuplicatePiece(piece));
        }
        Ok(seats)
    }

    fn check_piece(&self, piece: PieceId) -> Result<(), GameError> {
        if piece >= self.config.piece_count {
            return Err(GameError::PieceOutOfRange {
                piece,
                count: self.config.piece_count,
            });
        }
        Ok(())
    }

    /// Opens the current player's turn. `None` outside `Idle` or with
    /// nobody left to play.
    pub fn begin_turn(&mut self) -> Option<StepOutcome> {
        if !matches!(self.phase, TurnPhase::Idle) {
            log::debug!("begin_turn ignored in {}", self.phase.name());
            return None;
        }
        let player = self.roster.current_name()?;
        let dice_count = self
            .roster
            .get(&player)
            .map(PlayerState::dice_count)
            .unwrap_or(1);
        self.transition(TurnPhase::AwaitingRoll {
            player: player.clone(),
            purpose: RollPurpose::Movement,
        });
        Some(StepOutcome {
            events: vec![GameEvent::TurnBegan { player, dice_count }],
            done: false,
        })
    }

    /// Throws the dice. Only valid while awaiting a roll.
    ///
    /// A movement roll spends the player's dice bonus here; a scoring roll
    /// is always a single die and leaves the bonus alone.
    pub fn request_roll(
        &mut self,
        gesture: RollGesture,
        dice: &mut dyn DiceSubsystem,
    ) -> Option<RollRequest> {
        let TurnPhase::AwaitingRoll { player, purpose } = &self.phase else {
            log::debug!("roll request rejected in {}", self.phase.name());
            return None;
        };
        let (player, purpose) = (player.clone(), purpose.clone());
        let dice_count = match purpose {
            RollPurpose::Movement => {
                let Some(state) = self.roster.get_mut(&player) else {
                    log::warn!("{player} vanished before rolling");
                    self.transition(TurnPhase::Idle);
                    return None;
                };
                1 + state.spend_dice_bonus()
            }
            RollPurpose::Scoring(_) => 1,
        };

        self.next_roll_id += 1;
        self.rolls += 1;
        let request = RollRequest {
            roll_id: self.next_roll_id,
            player,
            dice_count,
            gesture,
        };
        self.transition(TurnPhase::Rolling {
            request: request.clone(),
            batch: DiceBatch::new(request.roll_id, dice_count),
            purpose,
        });
        dice.roll_gesture(&request);
        Some(request)
    }

    /// Whole-batch stop report. Reports for any roll but the live one are
    /// ignored, so a duplicate notification is harmless.
    pub fn on_all_dice_stopped(
        &mut self,
        roll_id: u64,
        outcomes: &[DieOutcome],
        animator: &mut dyn BoardAnimator,
    ) -> StepOutcome {
        let total = match &mut self.phase {
            TurnPhase::Rolling { batch, .. } if batch.roll_id() == roll_id => {
                batch.report_all(outcomes)
            }
            _ => None,
        };
        self.settle_if_ready(roll_id, total, animator)
    }

    /// Single-die stop report; the roll settles when the last die stops.
    pub fn on_die_stopped(
        &mut self,
        roll_id: u64,
        index: usize,
        outcome: DieOutcome,
        animator: &mut dyn BoardAnimator,
    ) -> StepOutcome {
        let total = match &mut self.phase {
            TurnPhase::Rolling { batch, .. } if batch.roll_id() == roll_id => {
                batch.report(index, outcome)
            }
            _ => None,
        };
        self.settle_if_ready(roll_id, total, animator)
    }

    fn settle_if_ready(
        &mut self,
        roll_id: u64,
        total: Option<DiceTotal>,
        animator: &mut dyn BoardAnimator,
    ) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        let Some(total) = total else {
            if self.pending_roll().map(|r| r.roll_id) != Some(roll_id) {
                log::debug!("ignoring stop report for stale roll {roll_id}");
            }
            return outcome;
        };
        let TurnPhase::Rolling {
            request,
            batch,
            purpose,
        } = self.transition(TurnPhase::Idle)
        else {
            return outcome;
        };
        let outcomes = batch.outcomes();
        outcome.events.push(GameEvent::DiceSettled {
            roll_id,
            outcomes: outcomes.clone(),
            total,
        });

        match purpose {
            RollPurpose::Movement => {
                self.resolve_movement(&request.player, total, animator, &mut outcome)
            }
            RollPurpose::Scoring(pending) => {
                let die = outcomes.first().copied().unwrap_or(DieOutcome::Dropped);
                let units = apply_scoring_roll(&pending, die, &mut self.roster);
                outcome.events.push(GameEvent::ScoringRollSettled {
                    target: pending.target,
                    outcome: die,
                    units,
                });
                self.end_turn(&request.player, &mut outcome);
            }
        }
        outcome
    }

    fn resolve_movement(
        &mut self,
        player: &str,
        total: DiceTotal,
        animator: &mut dyn BoardAnimator,
        outcome: &mut StepOutcome,
    ) {
        self.transition(TurnPhase::ResolvingMovement {
            player: player.to_string(),
            total,
        });
        let Some(state) = self.roster.get_mut(player) else {
            log::warn!("{player} left while the dice were rolling");
            self.transition(TurnPhase::Idle);
            return;
        };
        let moved = move_player(state, total, &self.board, &self.plan, animator);
        let finished = moved.finished;
        let landed = moved.landed_event;
        outcome.events.push(GameEvent::Moved(moved));
        if finished {
            self.finish(player, outcome);
            return;
        }

        self.transition(TurnPhase::ResolvingEvent {
            player: player.to_string(),
            event: landed,
        });
        match landed {
            Some(event) => self.fire_event(event, player, animator, outcome),
            None => self.end_turn(player, outcome),
        }
    }

    fn fire_event(
        &mut self,
        event: EventKind,
        player: &str,
        animator: &mut dyn BoardAnimator,
        outcome: &mut StepOutcome,
    ) {
        let mut ctx = EventContext {
            board: &self.board,
            plan: &self.plan,
            animator,
            multiplier_cap: self.config.multiplier_cap,
        };
        let resolution = match resolve_event(event, player, &mut self.roster, &mut ctx) {
            Ok(resolution) => resolution,
            Err(err) => {
                log::warn!("could not resolve {event} for {player}: {err}");
                self.end_turn(player, outcome);
                return;
            }
        };

        let forced_finish = match &resolution.effect {
            AppliedEffect::Moved(moved) if moved.finished => Some(moved.player.clone()),
            _ => None,
        };
        let pending = resolution.pending_score.clone();
        outcome.events.push(GameEvent::EventResolved(resolution));

        if let Some(winner) = forced_finish {
            self.finish(&winner, outcome);
        } else if let Some(pending) = pending {
            self.transition(TurnPhase::AwaitingRoll {
                player: player.to_string(),
                purpose: RollPurpose::Scoring(pending),
            });
        } else {
            self.end_turn(player, outcome);
        }
    }

    fn end_turn(&mut self, player: &str, outcome: &mut StepOutcome) {
        self.transition(TurnPhase::TurnEnd {
            player: player.to_string(),
        });
        self.roster.advance_turn();
        self.turns_played += 1;
        let next_player = self.roster.current_name();
        outcome.events.push(GameEvent::TurnAdvanced { next_player });
        self.transition(TurnPhase::Idle);
    }

    fn finish(&mut self, winner: &str, outcome: &mut StepOutcome) {
        log::info!(
            "{winner} reached the goal after {} turns",
            self.turns_played + 1
        );
        self.turns_played += 1;
        self.transition(TurnPhase::Completed {
            winner: winner.to_string(),
        });
        outcome.events.push(GameEvent::GameWon {
            winner: winner.to_string(),
        });
        outcome.done = true;
    }

    /// Mid-game join somewhere between the trailer and the leader.
    pub fn add_player(
        &mut self,
        name: &str,
        piece_id: PieceId,
        animator: &mut dyn BoardAnimator,
    ) -> Result<PlayerState, GameError> {
        match self.phase {
            TurnPhase::NotStarted => return Err(GameError::NotStarted),
            TurnPhase::Completed { .. } => return Err(GameError::GameFinished),
            _ => {}
        }
        if self.roster.len() >= self.config.max_players {
            return Err(GameError::RosterFull(self.config.max_players));
        }
        self.check_piece(piece_id)?;
        let name = match name.trim() {
            "" => self.free_default_name(),
            trimmed => trimmed.to_string(),
        };
        let player = self
            .roster
            .add_player(&name, piece_id, &mut self.rng)?
            .clone();
        animator.place_token_on_cell(&player.name, player.position);
        log::info!("{} joined on cell {}", player.name, player.position);
        Ok(player)
    }

    /// Lowest `Player N` nobody at the table is using.
    fn free_default_name(&self) -> String {
        let seats = self.roster.len() + 1;
        (1..=seats)
            .map(|n| format!("Player {n}"))
            .find(|name| !self.roster.contains(name))
            .unwrap_or_else(|| format!("Player {seats}"))
    }

    /// Removes a player and frees their piece. If it was their turn, the
    /// turn is abandoned and any roll in flight goes stale.
    pub fn remove_player(&mut self, name: &str) -> Result<PlayerState, GameError> {
        let removed = self.roster.remove_player(name)?;
        if self.phase.active_player() == Some(name) {
            log::info!("{name} left mid-turn, turn abandoned");
            self.transition(TurnPhase::Idle);
        } else {
            log::info!("{name} left the game");
        }
        Ok(removed)
    }

    /// Swaps in `next` and hands back the phase it replaced.
    fn transition(&mut self, next: TurnPhase) -> TurnPhase {
        let previous = std::mem::replace(&mut self.phase, next);
        log::debug!("{} -> {}", previous.name(), self.phase.name());
        previous
    }
}
