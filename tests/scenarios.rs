//! Whole-turn scenarios driven through the public session API.

#![allow(clippy::unwrap_used)]

use dice_party::env::StoppedBatch;
use dice_party::game::{
    DiceTotal, DieOutcome, GameEvent, PieceId, PlayerRoster, PlayerSetup, RollGesture, RollRequest,
    TurnPhase,
};
use dice_party::types::CellRole;
use dice_party::{
    Board, Cell, DiceSubsystem, EventKind, GameConfig, GameSession, LoggingAnimator,
};

/// Dice that never land on their own; the test delivers every stop.
#[derive(Default)]
struct HandDice {
    thrown: Vec<RollRequest>,
}

impl DiceSubsystem for HandDice {
    fn roll_gesture(&mut self, request: &RollRequest) {
        self.thrown.push(request.clone());
    }

    fn poll_stopped(&mut self) -> Option<StoppedBatch> {
        None
    }
}

fn board(board_length: usize, events: &[(usize, EventKind)]) -> Board {
    let cells = (0..=board_length)
        .map(|index| {
            let (role, event) = if index == 0 {
                (CellRole::Start, Some(EventKind::Drink))
            } else if index == board_length {
                (CellRole::Goal, None)
            } else {
                let event = events.iter().find(|(c, _)| *c == index).map(|(_, e)| *e);
                (CellRole::Normal, event)
            };
            Cell { index, role, event }
        })
        .collect();
    Board::from_cells(cells).unwrap()
}

fn session(board: Board, names: &[&str]) -> GameSession {
    let config = GameConfig {
        shuffle_turn_order: false,
        ..GameConfig::default()
    };
    let mut session = GameSession::with_board(config, board).unwrap();
    let setups: Vec<PlayerSetup> = names
        .iter()
        .enumerate()
        .map(|(i, n)| PlayerSetup::new(*n, i as PieceId))
        .collect();
    session
        .start_game(&setups, &mut LoggingAnimator::default())
        .unwrap();
    session
}

fn take_turn(session: &mut GameSession, faces: &[u8]) -> Vec<GameEvent> {
    session.begin_turn().unwrap();
    let request = session
        .request_roll(RollGesture::default(), &mut HandDice::default())
        .unwrap();
    let outcomes: Vec<DieOutcome> = faces.iter().map(|f| DieOutcome::Face(*f)).collect();
    session
        .on_all_dice_stopped(request.roll_id, &outcomes, &mut LoggingAnimator::default())
        .events
}

#[test]
fn next_player_cell_hits_the_successor() {
    let mut game = session(board(10, &[(4, EventKind::NextPlayerDrinks)]), &["P1", "P2"]);
    let events = take_turn(&mut game, &[4]);

    assert_eq!(game.roster().get("P1").unwrap().position, 4);
    let resolved = events
        .iter()
        .find_map(|e| match e {
            GameEvent::EventResolved(r) => Some(r),
            _ => None,
        })
        .unwrap();
    assert_eq!(resolved.applied_to.as_deref(), Some("P2"));
}

#[test]
fn doubled_bonus_die_grants_two_extra_dice() {
    let mut game = session(
        board(30, &[(2, EventKind::DoubleNext), (3, EventKind::BonusDie)]),
        &["P1", "P2"],
    );
    take_turn(&mut game, &[2]);
    take_turn(&mut game, &[6]);
    take_turn(&mut game, &[1]);
    assert_eq!(game.roster().get("P1").unwrap().dice_bonus, 2);
    take_turn(&mut game, &[6]);

    game.begin_turn().unwrap();
    let mut dice = HandDice::default();
    let request = game.request_roll(RollGesture::default(), &mut dice).unwrap();
    assert_eq!(request.dice_count, 3);
    assert_eq!(dice.thrown.len(), 1);
}

#[test]
fn dice_reported_one_by_one_settle_once() {
    let mut game = session(board(20, &[(1, EventKind::BonusDie)]), &["P1", "P2"]);
    take_turn(&mut game, &[1]);
    take_turn(&mut game, &[6]);

    game.begin_turn().unwrap();
    let request = game
        .request_roll(RollGesture::default(), &mut HandDice::default())
        .unwrap();
    assert_eq!(request.dice_count, 2);
    let mut animator = LoggingAnimator::default();

    let first = game.on_die_stopped(request.roll_id, 0, DieOutcome::Face(5), &mut animator);
    assert!(first.events.is_empty());
    let repeat = game.on_die_stopped(request.roll_id, 0, DieOutcome::Face(2), &mut animator);
    assert!(repeat.events.is_empty());
    assert!(matches!(game.phase(), TurnPhase::Rolling { .. }));

    let last = game.on_die_stopped(request.roll_id, 1, DieOutcome::Face(3), &mut animator);
    assert!(!last.events.is_empty());
    assert_eq!(game.roster().get("P1").unwrap().position, 9);

    let stray = game.on_die_stopped(request.roll_id, 1, DieOutcome::Face(3), &mut animator);
    assert!(stray.events.is_empty());
    assert_eq!(game.roster().get("P1").unwrap().position, 9);
}

#[test]
fn partially_dropped_roll_still_moves() {
    let mut game = session(
        board(20, &[(1, EventKind::DoubleNext), (2, EventKind::BonusDie)]),
        &["P1", "P2"],
    );
    take_turn(&mut game, &[1]);
    take_turn(&mut game, &[6]);
    take_turn(&mut game, &[1]);
    take_turn(&mut game, &[6]);

    game.begin_turn().unwrap();
    let request = game
        .request_roll(RollGesture::default(), &mut HandDice::default())
        .unwrap();
    assert_eq!(request.dice_count, 3);
    let events = game
        .on_all_dice_stopped(
            request.roll_id,
            &[DieOutcome::Face(4), DieOutcome::Dropped, DieOutcome::Face(2)],
            &mut LoggingAnimator::default(),
        )
        .events;
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::DiceSettled { total: DiceTotal::Sum(6), .. }
    )));
    assert_eq!(game.roster().get("P1").unwrap().position, 8);
}

#[test]
fn surplus_stop_reports_are_ignored() {
    let mut game = session(board(20, &[]), &["P1", "P2"]);
    game.begin_turn().unwrap();
    let request = game
        .request_roll(RollGesture::default(), &mut HandDice::default())
        .unwrap();
    assert_eq!(request.dice_count, 1);
    game.on_all_dice_stopped(
        request.roll_id,
        &[DieOutcome::Face(4), DieOutcome::Dropped, DieOutcome::Face(2)],
        &mut LoggingAnimator::default(),
    );
    assert_eq!(game.roster().get("P1").unwrap().position, 4);
}

#[test]
fn leader_and_trailer_ignore_call_order() {
    let mut roster = PlayerRoster::new();
    for (i, pos) in [3usize, 3, 5, 1].iter().enumerate() {
        let name = format!("p{i}");
        roster.seat(&name, i as PieceId).unwrap();
        roster.get_mut(&name).unwrap().position = *pos;
    }
    for _ in 0..3 {
        roster.advance_turn();
        assert_eq!(roster.leader().unwrap().name, "p2");
        assert_eq!(roster.trailer().unwrap().name, "p3");
    }
}

#[test]
fn ranking_is_available_after_a_win() {
    let mut game = session(board(6, &[]), &["P1", "P2", "P3"]);
    take_turn(&mut game, &[2]);
    take_turn(&mut game, &[3]);
    let events = take_turn(&mut game, &[6]);
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameWon { winner } if winner == "P3")));
    let names: Vec<&str> = game.ranking().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["P3", "P2", "P1"]);
}
