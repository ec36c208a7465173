use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Every label a board cell can carry.
///
/// Each variant knows its family, whom it targets and what it does, so the
/// resolver never has to inspect label text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Drink,
    NextPlayerDrinks,
    PreviousPlayerDrinks,
    LeaderDrinks,
    DoubleNext,
    BonusDie,
    RollAndDrink,
    AdvanceTwo,
    FallBackTwo,
}

impl EventKind {
    /// The baseline label: most common, and the fixed label of the start cell.
    pub const BASELINE: EventKind = EventKind::Drink;

    pub fn family(self) -> EventFamily {
        match self {
            EventKind::Drink => EventFamily::Baseline,
            EventKind::NextPlayerDrinks
            | EventKind::PreviousPlayerDrinks
            | EventKind::LeaderDrinks => EventFamily::Targeted,
            EventKind::DoubleNext => EventFamily::Multiplier,
            EventKind::BonusDie => EventFamily::BonusDice,
            EventKind::RollAndDrink => EventFamily::Scoring,
            EventKind::AdvanceTwo | EventKind::FallBackTwo => EventFamily::ForcedMove,
        }
    }

    pub fn target(self) -> TargetRule {
        match self {
            EventKind::NextPlayerDrinks => TargetRule::Next,
            EventKind::PreviousPlayerDrinks => TargetRule::Previous,
            EventKind::LeaderDrinks => TargetRule::Leader,
            _ => TargetRule::Current,
        }
    }

    pub fn effect(self) -> EventEffect {
        match self {
            EventKind::Drink
            | EventKind::NextPlayerDrinks
            | EventKind::PreviousPlayerDrinks
            | EventKind::LeaderDrinks => EventEffect::Score(1),
            EventKind::DoubleNext => EventEffect::DoubleMultiplier,
            EventKind::BonusDie => EventEffect::BonusDice(1),
            EventKind::RollAndDrink => EventEffect::ScoreByRoll,
            EventKind::AdvanceTwo => EventEffect::Shift(2),
            EventKind::FallBackTwo => EventEffect::Shift(-2),
        }
    }

    /// Whether the acting player's multiplier survives this event.
    pub fn keeps_multiplier(self) -> bool {
        matches!(
            self.family(),
            EventFamily::Multiplier | EventFamily::BonusDice | EventFamily::Scoring
        )
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EventFamily {
    Baseline,
    Targeted,
    Multiplier,
    BonusDice,
    Scoring,
    ForcedMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetRule {
    Current,
    Next,
    Previous,
    Leader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventEffect {
    /// Score units granted before the multiplier.
    Score(u32),
    DoubleMultiplier,
    /// Extra dice granted before the multiplier.
    BonusDice(u32),
    ScoreByRoll,
    Shift(i32),
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CellRole {
    Start,
    Normal,
    Goal,
}

/// Which ratio set the event pool is built from.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum PoolProfile {
    Classic,
    #[default]
    Enhanced,
}

impl PoolProfile {
    /// Relative weights of the non-baseline labels, in tie-break order.
    pub fn special_weights(self) -> &'static [(EventKind, u32)] {
        match self {
            PoolProfile::Classic => &[
                (EventKind::NextPlayerDrinks, 1),
                (EventKind::PreviousPlayerDrinks, 1),
                (EventKind::LeaderDrinks, 1),
            ],
            PoolProfile::Enhanced => &[
                (EventKind::NextPlayerDrinks, 3),
                (EventKind::PreviousPlayerDrinks, 3),
                (EventKind::LeaderDrinks, 2),
                (EventKind::DoubleNext, 2),
                (EventKind::BonusDie, 2),
                (EventKind::RollAndDrink, 2),
                (EventKind::AdvanceTwo, 1),
                (EventKind::FallBackTwo, 1),
            ],
        }
    }
}
