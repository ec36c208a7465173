//! Property tests for the roster, turn pointer and movement clamping.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use dice_party::LoggingAnimator;
use dice_party::coords::{TraversalPlan, zigzag_segments};
use dice_party::game::dice::DiceTotal;
use dice_party::game::movement::{clamp_target, move_player, shift_player};
use dice_party::game::{PlayerRoster, PlayerState};
use dice_party::{Board, PoolProfile};

#[derive(Debug, Clone)]
enum RosterOp {
    Add,
    Remove(usize),
    Advance,
}

fn roster_op() -> impl Strategy<Value = RosterOp> {
    prop_oneof![
        Just(RosterOp::Add),
        (0usize..8).prop_map(RosterOp::Remove),
        Just(RosterOp::Advance),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The current player is always live, or absent only when nobody is left.
    #[test]
    fn current_player_is_never_stale(ops in prop::collection::vec(roster_op(), 1..60), seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut roster = PlayerRoster::new();
        let mut added = 0u32;
        for op in ops {
            match op {
                RosterOp::Add => {
                    let name = format!("p{added}");
                    roster.add_player(&name, (added % 250) as u8, &mut rng).ok();
                    added += 1;
                }
                RosterOp::Remove(idx) => {
                    if let Some(name) = roster.turn_order().get(idx).cloned() {
                        roster.remove_player(&name).unwrap();
                    }
                }
                RosterOp::Advance => roster.advance_turn(),
            }
            prop_assert_eq!(roster.turn_order().len(), roster.len());
            match roster.current_name() {
                Some(name) => prop_assert!(roster.contains(&name)),
                None => prop_assert!(roster.is_empty()),
            }
            if !roster.is_empty() {
                prop_assert!(roster.turn_pointer() < roster.len());
            }
        }
    }

    /// Positions stay on the board whatever the roll or forced move.
    #[test]
    fn positions_stay_in_bounds(
        board_length in 1usize..80,
        start in 0usize..80,
        steps in 0u32..40,
        shift in -5i32..5,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::generate(board_length, PoolProfile::Enhanced, &mut rng).unwrap();
        let mut animator = LoggingAnimator::default();
        let plan = TraversalPlan::from_segments(
            &zigzag_segments(board.cell_count(), &animator.metrics),
            0.2,
        );
        let mut player = PlayerState::new("p", 0, 0).with_position(start.min(board_length));

        let moved = move_player(&mut player, DiceTotal::Sum(steps), &board, &plan, &mut animator);
        prop_assert!(moved.final_position <= board_length);
        prop_assert_eq!(moved.final_position, clamp_target(moved.from, i64::from(steps), board_length));
        prop_assert_eq!(moved.finished, moved.final_position == board_length);

        let shifted = shift_player(&mut player, shift, &board, &plan, &mut animator);
        prop_assert!(shifted.final_position <= board_length);
        prop_assert_eq!(player.position, shifted.final_position);
    }
}
