//! Seams to the collaborators that live outside game logic: the physics dice
//! and the board renderer.

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::coords::{LayoutMetrics, Segment, TraversalStep, zigzag_segments};
use crate::game::dice::{DiceOutcomes, RollRequest};

pub mod dice;

pub use dice::SimulatedDice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoppedBatch {
    pub roll_id: u64,
    pub outcomes: DiceOutcomes,
}

/// Physics dice. Rolling is fire-and-forget; stop reports are collected
/// later through `poll_stopped`.
pub trait DiceSubsystem {
    fn roll_gesture(&mut self, request: &RollRequest);

    fn poll_stopped(&mut self) -> Option<StoppedBatch>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    Completed,
    /// The renderer could not animate this step; the token is placed anyway.
    Skipped,
}

/// Board renderer. Every call returns only once its transition is done.
pub trait BoardAnimator {
    fn traversal_segments(&self, board: &Board) -> Vec<Segment>;

    fn place_token_on_cell(&mut self, player: &str, cell: usize);

    fn animate_step(&mut self, player: &str, step: &TraversalStep) -> StepStatus;

    fn vanish_and_reappear(&mut self, player: &str, cell: usize);
}

/// Headless renderer: reference zig-zag layout, transitions go to the log.
#[derive(Debug, Clone, Default)]
pub struct LoggingAnimator {
    pub metrics: LayoutMetrics,
}

impl BoardAnimator for LoggingAnimator {
    fn traversal_segments(&self, board: &Board) -> Vec<Segment> {
        zigzag_segments(board.cell_count(), &self.metrics)
    }

    fn place_token_on_cell(&mut self, player: &str, cell: usize) {
        log::trace!("{player} placed on cell {cell}");
    }

    fn animate_step(&mut self, player: &str, step: &TraversalStep) -> StepStatus {
        log::trace!(
            "{player} walks {} -> {} ({:.0}px, {:.0}ms)",
            step.from_cell,
            step.to_cell,
            step.arc_length,
            step.duration_ms
        );
        StepStatus::Completed
    }

    fn vanish_and_reappear(&mut self, player: &str, cell: usize) {
        log::trace!("{player} vanishes and reappears on cell {cell}");
    }
}
