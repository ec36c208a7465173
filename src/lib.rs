#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod coords;
pub mod env;
pub mod game;
pub mod players;
pub mod types;

pub use board::{Board, BoardError, Cell, EventPool};
pub use env::{BoardAnimator, DiceSubsystem, LoggingAnimator, SimulatedDice};
pub use game::{Game, GameConfig, GameError, GameSession, TurnPhase};
pub use types::{EventKind, PoolProfile};
