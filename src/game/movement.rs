use serde::{Deserialize, Serialize};

use super::dice::DiceTotal;
use super::players::PlayerState;
use crate::board::Board;
use crate::coords::TraversalPlan;
use crate::env::{BoardAnimator, StepStatus};
use crate::types::EventKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveTransition {
    /// Cell-by-cell walk forward.
    Traverse { steps: usize },
    /// Every die was dropped: the token blinks out and back on its cell.
    VanishInPlace,
    /// Backward forced move, shown as a vanish on the old cell and a drop on the new one.
    Jump,
    Stay,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub player: String,
    pub from: usize,
    pub final_position: usize,
    pub landed_event: Option<EventKind>,
    pub finished: bool,
    pub transition: MoveTransition,
    /// Steps the renderer could not animate.
    pub skipped_steps: usize,
}

/// Applies a movement roll.
///
/// The recorded position advances one cell per completed animation step, so
/// an interrupted walk always leaves the player on a real cell.
pub fn move_player(
    player: &mut PlayerState,
    total: DiceTotal,
    board: &Board,
    plan: &TraversalPlan,
    animator: &mut dyn BoardAnimator,
) -> MoveResult {
    let from = player.position;
    let board_length = board.board_length();

    if total == DiceTotal::AllDropped {
        animator.vanish_and_reappear(&player.name, from);
        return settled(player, from, MoveTransition::VanishInPlace, 0, None, board);
    }

    let target = clamp_target(from, i64::from(total.steps()), board_length);
    if target == from {
        return settled(player, from, MoveTransition::Stay, 0, None, board);
    }
    let skipped = walk(player, target, plan, animator);
    animator.place_token_on_cell(&player.name, target);
    let landed_event = board.event_at(target);
    settled(
        player,
        from,
        MoveTransition::Traverse {
            steps: target - from,
        },
        skipped,
        landed_event,
        board,
    )
}

/// Forced move from an event card. The destination's own event does not fire.
pub fn shift_player(
    player: &mut PlayerState,
    delta: i32,
    board: &Board,
    plan: &TraversalPlan,
    animator: &mut dyn BoardAnimator,
) -> MoveResult {
    let from = player.position;
    let target = clamp_target(from, i64::from(delta), board.board_length());
    if target > from {
        let skipped = walk(player, target, plan, animator);
        animator.place_token_on_cell(&player.name, target);
        let transition = MoveTransition::Traverse {
            steps: target - from,
        };
        settled(player, from, transition, skipped, None, board)
    } else if target < from {
        player.position = target;
        animator.vanish_and_reappear(&player.name, target);
        settled(player, from, MoveTransition::Jump, 0, None, board)
    } else {
        settled(player, from, MoveTransition::Stay, 0, None, board)
    }
}

pub fn clamp_target(from: usize, delta: i64, board_length: usize) -> usize {
    let raw = from as i64 + delta;
    raw.clamp(0, board_length as i64) as usize
}

fn walk(
    player: &mut PlayerState,
    target: usize,
    plan: &TraversalPlan,
    animator: &mut dyn BoardAnimator,
) -> usize {
    let mut skipped = 0;
    for cell in player.position..target {
        let status = match plan.step(cell) {
            Some(step) => animator.animate_step(&player.name, step),
            None => {
                log::warn!("no path segment leaving cell {cell}, skipping animation");
                StepStatus::Skipped
            }
        };
        if status == StepStatus::Skipped {
            skipped += 1;
        }
        player.position = cell + 1;
    }
    skipped
}

fn settled(
    player: &PlayerState,
    from: usize,
    transition: MoveTransition,
    skipped_steps: usize,
    landed_event: Option<EventKind>,
    board: &Board,
) -> MoveResult {
    MoveResult {
        player: player.name.clone(),
        from,
        final_position: player.position,
        landed_event,
        finished: board.is_goal(player.position),
        transition,
        skipped_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::coords::{Segment, TraversalStep};
    use crate::types::CellRole;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl BoardAnimator for Recorder {
        fn traversal_segments(&self, _board: &Board) -> Vec<Segment> {
            Vec::new()
        }

        fn place_token_on_cell(&mut self, player: &str, cell: usize) {
            self.calls.push(format!("place {player} {cell}"));
        }

        fn animate_step(&mut self, player: &str, step: &TraversalStep) -> StepStatus {
            self.calls.push(format!("step {player} {}", step.to_cell));
            StepStatus::Completed
        }

        fn vanish_and_reappear(&mut self, player: &str, cell: usize) {
            self.calls.push(format!("vanish {player} {cell}"));
        }
    }

    fn board_with(events: &[Option<EventKind>]) -> Board {
        let last = events.len() - 1;
        let cells = events
            .iter()
            .enumerate()
            .map(|(index, event)| Cell {
                index,
                role: match index {
                    0 => CellRole::Start,
                    i if i == last => CellRole::Goal,
                    _ => CellRole::Normal,
                },
                event: *event,
            })
            .collect();
        Board::from_cells(cells).unwrap()
    }

    fn plan_for(board: &Board, missing: Option<usize>) -> TraversalPlan {
        let segments: Vec<Segment> = (0..board.board_length())
            .map(|i| {
                let mut seg = Segment::line(
                    crate::coords::Point::new(i as f64, 0.0),
                    crate::coords::Point::new(i as f64 + 1.0, 0.0),
                );
                if Some(i) == missing {
                    seg.length = 0.0;
                }
                seg
            })
            .collect();
        TraversalPlan::from_segments(&segments, 0.2)
    }

    #[test]
    fn walks_one_cell_at_a_time_and_reports_landing() {
        let mut events = vec![Some(EventKind::Drink); 11];
        events[4] = Some(EventKind::NextPlayerDrinks);
        events[10] = None;
        let board = board_with(&events);
        let plan = plan_for(&board, None);
        let mut animator = Recorder::default();
        let mut player = PlayerState::new("p1", 0, 0);

        let result = move_player(&mut player, DiceTotal::Sum(4), &board, &plan, &mut animator);
        assert_eq!(player.position, 4);
        assert_eq!(result.landed_event, Some(EventKind::NextPlayerDrinks));
        assert_eq!(result.transition, MoveTransition::Traverse { steps: 4 });
        assert!(!result.finished);
        assert_eq!(
            animator.calls,
            vec!["step p1 1", "step p1 2", "step p1 3", "step p1 4", "place p1 4"]
        );
    }

    #[test]
    fn overshoot_clamps_to_goal() {
        let board = board_with(&[None; 6]);
        let plan = plan_for(&board, None);
        let mut player = PlayerState::new("p1", 0, 0).with_position(3);
        let result = move_player(
            &mut player,
            DiceTotal::Sum(12),
            &board,
            &plan,
            &mut Recorder::default(),
        );
        assert_eq!(result.final_position, 5);
        assert!(result.finished);
    }

    #[test]
    fn all_dropped_stays_and_vanishes() {
        let board = board_with(&[Some(EventKind::Drink); 6]);
        let plan = plan_for(&board, None);
        let mut animator = Recorder::default();
        let mut player = PlayerState::new("p1", 0, 0).with_position(2);
        let result = move_player(&mut player, DiceTotal::AllDropped, &board, &plan, &mut animator);
        assert_eq!(result.final_position, 2);
        assert_eq!(result.landed_event, None);
        assert_eq!(result.transition, MoveTransition::VanishInPlace);
        assert_eq!(animator.calls, vec!["vanish p1 2"]);
    }

    #[test]
    fn missing_segment_is_skipped_not_fatal() {
        let board = board_with(&[None; 6]);
        let plan = plan_for(&board, Some(1));
        let mut animator = Recorder::default();
        let mut player = PlayerState::new("p1", 0, 0);
        let result = move_player(&mut player, DiceTotal::Sum(3), &board, &plan, &mut animator);
        assert_eq!(result.final_position, 3);
        assert_eq!(result.skipped_steps, 1);
        assert_eq!(animator.calls, vec!["step p1 1", "step p1 3", "place p1 3"]);
    }

    #[test]
    fn backward_shift_clamps_at_start() {
        let board = board_with(&[Some(EventKind::Drink); 8]);
        let plan = plan_for(&board, None);
        let mut player = PlayerState::new("p1", 0, 0).with_position(1);
        let result = shift_player(&mut player, -2, &board, &plan, &mut Recorder::default());
        assert_eq!(result.final_position, 0);
        assert_eq!(result.transition, MoveTransition::Jump);
        assert_eq!(result.landed_event, None);
    }
}
