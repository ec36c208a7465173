use serde::{Deserialize, Serialize};

/// Turn order plus the pointer at whoever acts now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnCycle {
    order: Vec<String>,
    pointer: usize,
}

impl TurnCycle {
    pub fn new(order: Vec<String>) -> Self {
        Self { order, pointer: 0 }
    }

    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.order.push(name.into());
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }

    /// Drops `name` and keeps the pointer on a live slot.
    ///
    /// Removing an earlier seat shifts the pointer back so the same player
    /// stays current. Removing the current seat leaves the pointer on the
    /// seat that slid into its place.
    pub fn remove(&mut self, name: &str) -> Option<usize> {
        let idx = self.index_of(name)?;
        self.order.remove(idx);
        if idx < self.pointer {
            self.pointer -= 1;
        }
        self.wrap_pointer();
        Some(idx)
    }

    /// Resolves the current seat, skipping names `is_live` rejects.
    pub fn current(&mut self, is_live: impl Fn(&str) -> bool) -> Option<&str> {
        self.wrap_pointer();
        let len = self.order.len();
        for _ in 0..len {
            if is_live(&self.order[self.pointer]) {
                return Some(&self.order[self.pointer]);
            }
            log::debug!("skipping stale turn slot {}", self.order[self.pointer]);
            self.pointer = (self.pointer + 1) % len;
        }
        None
    }

    pub fn advance(&mut self) {
        if self.order.is_empty() {
            self.pointer = 0;
            return;
        }
        self.pointer = (self.pointer + 1) % self.order.len();
    }

    pub fn next_after(&self, name: &str) -> Option<&str> {
        let idx = self.index_of(name)?;
        let next = (idx + 1) % self.order.len();
        Some(&self.order[next])
    }

    pub fn previous_before(&self, name: &str) -> Option<&str> {
        let idx = self.index_of(name)?;
        let len = self.order.len();
        Some(&self.order[(idx + len - 1) % len])
    }

    fn wrap_pointer(&mut self) {
        if self.order.is_empty() {
            self.pointer = 0;
        } else if self.pointer >= self.order.len() {
            self.pointer %= self.order.len();
        }
    }
}
