use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub type DiceOutcomes = SmallVec<[DieOutcome; 4]>;

/// Raw value the physics layer reports for a die that left the bowl.
pub const DROPPED_SENTINEL: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieOutcome {
    Face(u8),
    Dropped,
}

#[derive(Debug, thiserror::Error)]
pub enum DiceError {
    #[error("die reported impossible face {0}")]
    InvalidFace(i32),
}

impl DieOutcome {
    /// Movement contributed by this die; a dropped die counts for nothing.
    pub fn value(self) -> u32 {
        match self {
            DieOutcome::Face(face) => face as u32,
            DieOutcome::Dropped => 0,
        }
    }

    pub fn is_dropped(self) -> bool {
        matches!(self, DieOutcome::Dropped)
    }

    pub fn is_valid(self) -> bool {
        match self {
            DieOutcome::Face(face) => (1..=6).contains(&face),
            DieOutcome::Dropped => true,
        }
    }
}

impl TryFrom<i32> for DieOutcome {
    type Error = DiceError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            DROPPED_SENTINEL => Ok(DieOutcome::Dropped),
            1..=6 => Ok(DieOutcome::Face(raw as u8)),
            other => Err(DiceError::InvalidFace(other)),
        }
    }
}

/// Aggregate of one batch.
///
/// `AllDropped` is the whole-roll sentinel: nothing landed, so the token
/// stays put. Partial drops just shrink the sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiceTotal {
    Sum(u32),
    AllDropped,
}

impl DiceTotal {
    pub fn from_outcomes(outcomes: &[DieOutcome]) -> Self {
        if outcomes.iter().all(|o| o.is_dropped()) {
            return DiceTotal::AllDropped;
        }
        DiceTotal::Sum(outcomes.iter().map(|o| o.value()).sum())
    }

    pub fn steps(self) -> u32 {
        match self {
            DiceTotal::Sum(total) => total,
            DiceTotal::AllDropped => 0,
        }
    }
}

/// Release gesture forwarded to the dice subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollGesture {
    /// Throw strength in `[0, 1]`.
    pub intensity: f32,
    pub spin: f32,
}

impl Default for RollGesture {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            spin: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollRequest {
    pub roll_id: u64,
    pub player: String,
    pub dice_count: u32,
    pub gesture: RollGesture,
}

/// Collects per-die stop reports and emits the total exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceBatch {
    roll_id: u64,
    slots: SmallVec<[Option<DieOutcome>; 4]>,
    resolved: bool,
}

impl DiceBatch {
    pub fn new(roll_id: u64, dice_count: u32) -> Self {
        Self {
            roll_id,
            slots: SmallVec::from_elem(None, dice_count.max(1) as usize),
            resolved: false,
        }
    }

    pub fn roll_id(&self) -> u64 {
        self.roll_id
    }

    pub fn dice_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn outcomes(&self) -> DiceOutcomes {
        self.slots.iter().map(|slot| slot.unwrap_or(DieOutcome::Dropped)).collect()
    }

    /// Records one die; yields the total once every die has stopped.
    pub fn report(&mut self, index: usize, outcome: DieOutcome) -> Option<DiceTotal> {
        if self.resolved {
            return None;
        }
        let Some(slot) = self.slots.get_mut(index) else {
            log::warn!("roll {} has no die {index}", self.roll_id);
            return None;
        };
        if slot.is_some() {
            log::debug!("die {index} of roll {} already stopped", self.roll_id);
            return None;
        }
        *slot = Some(checked(self.roll_id, index, outcome));
        if self.slots.iter().all(Option::is_some) {
            return Some(self.resolve());
        }
        None
    }

    /// Records a whole batch at once. Missing dice count as dropped and
    /// surplus reports are ignored.
    pub fn report_all(&mut self, outcomes: &[DieOutcome]) -> Option<DiceTotal> {
        if self.resolved {
            return None;
        }
        if outcomes.len() != self.slots.len() {
            log::warn!(
                "roll {} expected {} dice but {} reported",
                self.roll_id,
                self.slots.len(),
                outcomes.len()
            );
        }
        let roll_id = self.roll_id;
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                let outcome = outcomes.get(idx).copied().unwrap_or(DieOutcome::Dropped);
                *slot = Some(checked(roll_id, idx, outcome));
            }
        }
        Some(self.resolve())
    }

    fn resolve(&mut self) -> DiceTotal {
        self.resolved = true;
        DiceTotal::from_outcomes(&self.outcomes())
    }
}

/// A face off the die counts as a die that left the bowl.
fn checked(roll_id: u64, index: usize, outcome: DieOutcome) -> DieOutcome {
    if outcome.is_valid() {
        return outcome;
    }
    log::warn!("roll {roll_id} die {index} reported {outcome:?}, counting it as dropped");
    DieOutcome::Dropped
}
