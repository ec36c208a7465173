use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DiceSubsystem, StoppedBatch};
use crate::game::dice::{DieOutcome, RollRequest};

/// Stand-in for the physics bowl: fair faces, and a chance that a hard
/// throw sends a die over the rim.
#[derive(Debug, Clone)]
pub struct SimulatedDice {
    rng: StdRng,
    /// Drop chance per die at full intensity.
    pub drop_chance: f64,
    /// Report every batch twice, the way a jittery physics loop can.
    pub echo_stops: bool,
    pending: VecDeque<StoppedBatch>,
    dropped: u64,
}

impl SimulatedDice {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            drop_chance: 0.05,
            echo_stops: false,
            pending: VecDeque::new(),
            dropped: 0,
        }
    }

    pub fn with_drop_chance(mut self, drop_chance: f64) -> Self {
        self.drop_chance = drop_chance.clamp(0.0, 1.0);
        self
    }

    pub fn with_echo(mut self, echo_stops: bool) -> Self {
        self.echo_stops = echo_stops;
        self
    }

    /// Dice lost over the rim so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl DiceSubsystem for SimulatedDice {
    fn roll_gesture(&mut self, request: &RollRequest) {
        let intensity = f64::from(request.gesture.intensity).clamp(0.0, 1.0);
        let p_drop = (self.drop_chance * intensity).clamp(0.0, 1.0);
        let outcomes = (0..request.dice_count)
            .map(|_| {
                if self.rng.gen_bool(p_drop) {
                    self.dropped += 1;
                    DieOutcome::Dropped
                } else {
                    DieOutcome::Face(self.rng.gen_range(1..=6))
                }
            })
            .collect();
        let batch = StoppedBatch {
            roll_id: request.roll_id,
            outcomes,
        };
        if self.echo_stops {
            self.pending.push_back(batch.clone());
        }
        self.pending.push_back(batch);
    }

    fn poll_stopped(&mut self) -> Option<StoppedBatch> {
        self.pending.pop_front()
    }
}
