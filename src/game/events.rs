use serde::{Deserialize, Serialize};

use super::dice::DieOutcome;
use super::movement::{MoveResult, shift_player};
use super::roster::{PlayerRoster, RosterError};
use crate::board::Board;
use crate::coords::TraversalPlan;
use crate::env::BoardAnimator;
use crate::types::{EventEffect, EventKind, TargetRule};

/// Board state an event may need to move a token.
pub struct EventContext<'a> {
    pub board: &'a Board,
    pub plan: &'a TraversalPlan,
    pub animator: &'a mut dyn BoardAnimator,
    pub multiplier_cap: u32,
}

/// A scoring roll still owed by the dice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingScore {
    pub target: String,
    pub multiplier: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppliedEffect {
    Scored { units: u32 },
    MultiplierRaised { to: u32 },
    BonusDiceGranted { amount: u32, pending: u32 },
    ScoringRollPending,
    Moved(MoveResult),
    NoTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventResolution {
    pub event: EventKind,
    pub actor: String,
    pub applied_to: Option<String>,
    /// Actor's multiplier when the event fired.
    pub multiplier: u32,
    pub effect: AppliedEffect,
    pub requires_reroll: bool,
    pub pending_score: Option<PendingScore>,
    pub multiplier_reset: bool,
}

pub fn resolve_target(rule: TargetRule, actor: &str, roster: &PlayerRoster) -> Option<String> {
    let target = match rule {
        TargetRule::Current => roster.get(actor),
        TargetRule::Next => roster.next_of(actor),
        TargetRule::Previous => roster.previous_of(actor),
        TargetRule::Leader => roster.leader(),
    };
    target.map(|p| p.name.clone())
}

/// Fires `event` on behalf of `actor`.
///
/// The actor's multiplier scales score and bonus-dice grants whoever the
/// target is. It survives multiplier, bonus-dice and scoring events and
/// drops back to 1 after anything else.
pub fn resolve_event(
    event: EventKind,
    actor: &str,
    roster: &mut PlayerRoster,
    ctx: &mut EventContext<'_>,
) -> Result<EventResolution, RosterError> {
    let multiplier = roster
        .get(actor)
        .map(|p| p.effect_multiplier)
        .ok_or_else(|| RosterError::UnknownPlayer(actor.to_string()))?;
    let applied_to = resolve_target(event.target(), actor, roster);

    let mut requires_reroll = false;
    let mut pending_score = None;
    let effect = match applied_to.as_deref().and_then(|name| roster.get_mut(name)) {
        None => AppliedEffect::NoTarget,
        Some(target) => match event.effect() {
            EventEffect::Score(base) => {
                let units = base.saturating_mul(multiplier);
                target.add_score(units);
                AppliedEffect::Scored { units }
            }
            EventEffect::DoubleMultiplier => AppliedEffect::MultiplierRaised {
                to: target.double_multiplier(ctx.multiplier_cap),
            },
            EventEffect::BonusDice(base) => {
                let amount = base.saturating_mul(multiplier);
                target.dice_bonus = target.dice_bonus.saturating_add(amount);
                AppliedEffect::BonusDiceGranted {
                    amount,
                    pending: target.dice_bonus,
                }
            }
            EventEffect::ScoreByRoll => {
                requires_reroll = true;
                pending_score = Some(PendingScore {
                    target: target.name.clone(),
                    multiplier,
                });
                AppliedEffect::ScoringRollPending
            }
            EventEffect::Shift(delta) => AppliedEffect::Moved(shift_player(
                target,
                delta,
                ctx.board,
                ctx.plan,
                &mut *ctx.animator,
            )),
        },
    };

    let multiplier_reset = !event.keeps_multiplier();
    if multiplier_reset {
        if let Some(player) = roster.get_mut(actor) {
            player.reset_multiplier();
        }
    }

    log::debug!("{actor} triggered {event} (x{multiplier}) on {applied_to:?}: {effect:?}");
    Ok(EventResolution {
        event,
        actor: actor.to_string(),
        applied_to,
        multiplier,
        effect,
        requires_reroll,
        pending_score,
        multiplier_reset,
    })
}

/// Settles a scoring roll: face times the multiplier captured when the
/// event fired. Returns `None` if the target left the game meanwhile.
pub fn apply_scoring_roll(
    pending: &PendingScore,
    outcome: DieOutcome,
    roster: &mut PlayerRoster,
) -> Option<u32> {
    let target = roster.get_mut(&pending.target)?;
    let units = outcome.value().saturating_mul(pending.multiplier);
    target.add_score(units);
    Some(units)
}
