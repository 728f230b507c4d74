use std::collections::VecDeque;

use crate::detection::{Detection, Projectile};

/// The parts of a detection that take part in the vote.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub score: u32,
    pub projectiles: Vec<Projectile>,
}

impl From<&Detection> for Reading {
    fn from(detection: &Detection) -> Self {
        Self {
            score: detection.aggregate_score,
            projectiles: detection.projectiles.clone(),
        }
    }
}

/// Bounded FIFO of the most recent readings.
#[derive(Clone, Debug)]
pub struct VoteBuffer {
    readings: VecDeque<Reading>,
    capacity: usize,
}

impl VoteBuffer {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Append a reading, evicting the oldest once over capacity.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push_back(reading);
        while self.readings.len() > self.capacity {
            self.readings.pop_front();
        }
    }

    pub fn newest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// Every buffered reading carries the newest reading's score.
    ///
    /// A single buffered reading always agrees with itself; an empty buffer never agrees.
    pub fn all_agree(&self) -> bool {
        match self.readings.back() {
            Some(newest) => self.readings.iter().all(|r| r.score == newest.score),
            None => false,
        }
    }

    /// Buffered scores, oldest first.
    pub fn scores(&self) -> Vec<u32> {
        self.readings.iter().map(|r| r.score).collect()
    }

    pub fn clear(&mut self) {
        self.readings.clear();
    }
}
