use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{CellRole, EventKind, PoolProfile};

pub mod pool;

pub use pool::EventPool;

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("board length {board_length} is too short")]
    Degenerate { board_length: usize },
    #[error("event pool ran out at cell {cell} with {unassigned} cells left unassigned")]
    PoolExhausted { cell: usize, unassigned: usize },
    #[error("{remaining} event labels left over after assignment")]
    PoolLeftover { remaining: usize },
    #[error("start cell carries {0} instead of the baseline label")]
    StartLabel(EventKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub index: usize,
    pub role: CellRole,
    pub event: Option<EventKind>,
}

/// Linear track of `board_length + 1` cells: start at 0, goal at `board_length`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Cells with roles but no events yet.
    pub fn blank(board_length: usize) -> Result<Self, BoardError> {
        if board_length < 1 {
            return Err(BoardError::Degenerate { board_length });
        }
        let cells = (0..=board_length)
            .map(|index| Cell {
                index,
                role: role_for(index, board_length),
                event: None,
            })
            .collect();
        Ok(Self { cells })
    }

    pub fn generate(
        board_length: usize,
        profile: PoolProfile,
        rng: &mut impl Rng,
    ) -> Result<Self, BoardError> {
        let mut board = Self::blank(board_length)?;
        let mut pool = EventPool::build(board_length, profile)?;
        assign_events(&mut board.cells, &mut pool, rng)?;
        Ok(board)
    }

    /// Prebuilt track. The start cell may only carry the baseline label.
    pub fn from_cells(cells: Vec<Cell>) -> Result<Self, BoardError> {
        if cells.len() < 2 {
            return Err(BoardError::Degenerate {
                board_length: cells.len().saturating_sub(1),
            });
        }
        match cells[0].event {
            Some(event) if event != EventKind::BASELINE => Err(BoardError::StartLabel(event)),
            _ => Ok(Self { cells }),
        }
    }

    /// Index of the goal cell.
    pub fn board_length(&self) -> usize {
        self.cells.len() - 1
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn event_at(&self, index: usize) -> Option<EventKind> {
        self.cells.get(index).and_then(|cell| cell.event)
    }

    pub fn is_goal(&self, index: usize) -> bool {
        index == self.board_length()
    }

    pub fn event_counts(&self) -> BTreeMap<EventKind, usize> {
        let mut counts = BTreeMap::new();
        for event in self.cells.iter().filter_map(|cell| cell.event) {
            *counts.entry(event).or_insert(0) += 1;
        }
        counts
    }
}

impl TryFrom<Vec<Cell>> for Board {
    type Error = BoardError;

    fn try_from(cells: Vec<Cell>) -> Result<Self, Self::Error> {
        Self::from_cells(cells)
    }
}

impl From<Board> for Vec<Cell> {
    fn from(board: Board) -> Self {
        board.cells
    }
}

fn role_for(index: usize, board_length: usize) -> CellRole {
    if index == 0 {
        CellRole::Start
    } else if index == board_length {
        CellRole::Goal
    } else {
        CellRole::Normal
    }
}

/// Draws one label per normal cell from `pool` without replacement.
///
/// The start cell gets the baseline label and the goal gets none. The pool
/// must be sized to the normal cells exactly.
pub fn assign_events(
    cells: &mut [Cell],
    pool: &mut EventPool,
    rng: &mut impl Rng,
) -> Result<(), BoardError> {
    let normal_total = cells
        .iter()
        .filter(|cell| cell.role == CellRole::Normal)
        .count();
    let mut assigned = 0;
    for cell in cells.iter_mut() {
        cell.event = match cell.role {
            CellRole::Start => Some(EventKind::BASELINE),
            CellRole::Goal => None,
            CellRole::Normal => {
                let label = pool.draw(rng).ok_or(BoardError::PoolExhausted {
                    cell: cell.index,
                    unassigned: normal_total - assigned,
                })?;
                assigned += 1;
                Some(label)
            }
        };
    }
    if !pool.is_empty() {
        return Err(BoardError::PoolLeftover {
            remaining: pool.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn generated_board_labels_every_normal_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let board = Board::generate(50, PoolProfile::Enhanced, &mut rng).unwrap();
        assert_eq!(board.cell_count(), 51);
        assert_eq!(board.event_at(0), Some(EventKind::Drink));
        assert_eq!(board.event_at(50), None);
        assert!(board.cells()[1..50].iter().all(|c| c.event.is_some()));

        let mut expected = EventPool::build(50, PoolProfile::Enhanced).unwrap().counts();
        *expected.entry(EventKind::Drink).or_insert(0) += 1;
        assert_eq!(board.event_counts(), expected);
    }

    #[test]
    fn undersized_pool_fails_loudly() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::blank(5).unwrap();
        let mut pool = EventPool::from_labels(vec![EventKind::Drink; 3]);
        let err = assign_events(&mut board.cells, &mut pool, &mut rng).unwrap_err();
        assert!(matches!(err, BoardError::PoolExhausted { cell: 4, unassigned: 1 }));
    }

    #[test]
    fn oversized_pool_fails_loudly() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut board = Board::blank(3).unwrap();
        let mut pool = EventPool::from_labels(vec![EventKind::BonusDie; 4]);
        let err = assign_events(&mut board.cells, &mut pool, &mut rng).unwrap_err();
        assert!(matches!(err, BoardError::PoolLeftover { remaining: 2 }));
    }

    #[test]
    fn roles_are_fixed_by_index() {
        let board = Board::blank(1).unwrap();
        let roles: Vec<CellRole> = board.cells().iter().map(|c| c.role).collect();
        assert_eq!(roles, vec![CellRole::Start, CellRole::Goal]);
        assert!(Board::blank(0).is_err());
    }

    #[test]
    fn start_cell_only_takes_the_baseline() {
        let mut cells = Board::blank(4).unwrap().cells().to_vec();
        cells[0].event = Some(EventKind::RollAndDrink);
        assert!(matches!(
            Board::from_cells(cells.clone()),
            Err(BoardError::StartLabel(EventKind::RollAndDrink))
        ));
        cells[0].event = Some(EventKind::BASELINE);
        assert!(Board::from_cells(cells).is_ok());
    }

    #[test]
    fn deserializing_checks_the_cells() {
        assert!(serde_json::from_str::<Board>("[]").is_err());

        let mut rng = StdRng::seed_from_u64(8);
        let board = Board::generate(12, PoolProfile::Classic, &mut rng).unwrap();
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cells(), board.cells());
    }
}
