use std::collections::VecDeque;

use crate::subtitle_processor::Subtitle;

/// Bounded stack of subtitle list snapshots for undo
#[derive(Debug, Clone)]
pub struct SubtitleHistory {
    snapshots: VecDeque<Vec<Subtitle>>,
    limit: usize,
}

impl SubtitleHistory {
    /// Create an empty history keeping at most `limit` snapshots
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(limit),
            limit: limit.max(1),
        }
    }

    /// Push a snapshot, evicting the oldest when full
    pub fn push(&mut self, snapshot: Vec<Subtitle>) {
        if self.snapshots.len() == self.limit {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Take the most recent snapshot
    pub fn pop(&mut self) -> Option<Vec<Subtitle>> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
