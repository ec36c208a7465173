use std::collections::BTreeMap;

use itertools::Itertools;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::BoardError;
use crate::types::{EventKind, PoolProfile};

/// Multiset of event labels, one per normal cell.
///
/// Composition is fixed by the board length and profile; only the draw order
/// is random.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPool {
    labels: Vec<EventKind>,
}

impl EventPool {
    pub fn build(board_length: usize, profile: PoolProfile) -> Result<Self, BoardError> {
        if board_length < 1 {
            return Err(BoardError::Degenerate { board_length });
        }
        let normal_cells = board_length - 1;
        let baseline = baseline_count(board_length);
        let specials = split_by_weight(normal_cells - baseline, profile.special_weights());

        let mut labels = Vec::with_capacity(normal_cells);
        labels.extend(std::iter::repeat(EventKind::BASELINE).take(baseline));
        for (kind, count) in specials {
            labels.extend(std::iter::repeat(kind).take(count));
        }
        debug_assert_eq!(labels.len(), normal_cells);
        Ok(Self { labels })
    }

    pub fn from_labels(labels: Vec<EventKind>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.labels.iter().filter(|label| **label == kind).count()
    }

    pub fn counts(&self) -> BTreeMap<EventKind, usize> {
        self.labels.iter().copied().counts().into_iter().collect()
    }

    /// Removes and returns a uniformly chosen label.
    pub fn draw(&mut self, rng: &mut impl Rng) -> Option<EventKind> {
        if self.labels.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.labels.len());
        Some(self.labels.swap_remove(idx))
    }
}

/// round(L / 2), never more than the normal cells available.
pub fn baseline_count(board_length: usize) -> usize {
    board_length.div_ceil(2).min(board_length.saturating_sub(1))
}

/// Largest-remainder split of `total` across `weights`; ties go to the
/// earlier entry.
fn split_by_weight(total: usize, weights: &[(EventKind, u32)]) -> Vec<(EventKind, usize)> {
    let weight_sum: usize = weights.iter().map(|(_, w)| *w as usize).sum();
    if weight_sum == 0 {
        return Vec::new();
    }
    let mut shares: Vec<(EventKind, usize)> = weights
        .iter()
        .map(|(kind, w)| (*kind, total * *w as usize / weight_sum))
        .collect();
    let assigned: usize = shares.iter().map(|(_, n)| n).sum();

    let by_remainder = weights
        .iter()
        .enumerate()
        .map(|(idx, (_, w))| (idx, total * *w as usize % weight_sum))
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .map(|(idx, _)| idx)
        .collect::<Vec<_>>();
    for idx in by_remainder.into_iter().take(total - assigned) {
        shares[idx].1 += 1;
    }
    shares
}
