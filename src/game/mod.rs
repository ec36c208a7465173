pub mod dice;
pub mod events;
pub mod game;
pub mod movement;
pub mod players;
pub mod roster;
pub mod state;
pub mod turn;

pub use dice::{DiceBatch, DiceTotal, DieOutcome, RollGesture, RollRequest};
pub use events::{EventResolution, resolve_event, resolve_target};
pub use game::Game;
pub use movement::{MoveResult, MoveTransition, move_player};
pub use players::{PieceId, PlayerSetup, PlayerState};
pub use roster::{PlayerRoster, RosterError};
pub use state::{
    GameConfig, GameError, GameEvent, GameSession, RollPurpose, StepOutcome, TurnPhase,
};
pub use turn::TurnCycle;
