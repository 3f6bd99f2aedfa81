use serde::{Deserialize, Serialize};

use crate::adaptive::types::AffectObservation;

/// Fixed-capacity affect log. Slots are reused in place once full; `head`
/// always points at the oldest retained observation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectHistory {
    slots: Vec<AffectObservation>,
    head: usize,
    capacity: usize,
}

impl AffectHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Returns the evicted observation when the buffer was already full.
    pub fn push(&mut self, observation: AffectObservation) -> Option<AffectObservation> {
        if self.slots.len() < self.capacity {
            self.slots.push(observation);
            return None;
        }
        let evicted = std::mem::replace(&mut self.slots[self.head], observation);
        self.head = (self.head + 1) % self.capacity;
        Some(evicted)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &AffectObservation> + '_ {
        let (newer, older) = self.slots.split_at(self.head);
        older.iter().chain(newer.iter())
    }

    pub fn latest(&self) -> Option<&AffectObservation> {
        self.iter().next_back()
    }

    /// Up to `n` most recent observations, oldest first.
    pub fn recent(&self, n: usize) -> Vec<AffectObservation> {
        let skip = self.len().saturating_sub(n);
        self.iter().skip(skip).cloned().collect()
    }
}

impl Default for AffectHistory {
    fn default() -> Self {
        Self::with_capacity(100)
    }
}
