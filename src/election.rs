//! Top-N producer selection.

use crate::constants::MAX_ELECTED_PRODUCERS;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Candidate {
    /// Producer account bytes; the canonical schedule order.
    pub key: [u8; 32],
    pub votes: u64,
}

impl Candidate {
    /// Vote order: more votes first, ties broken by account.
    fn ranks_before(&self, other: &Candidate) -> bool {
        self.votes > other.votes || (self.votes == other.votes && self.key < other.key)
    }
}

/// Keeps the best [`MAX_ELECTED_PRODUCERS`] active producers with positive votes.
pub struct TopProducers {
    entries: [Candidate; MAX_ELECTED_PRODUCERS],
    len: usize,
}

impl Default for TopProducers {
    fn default() -> Self {
        Self::new()
    }
}

impl TopProducers {
    pub fn new() -> Self {
        TopProducers {
            entries: [Candidate::default(); MAX_ELECTED_PRODUCERS],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Offers a producer from the registry scan; order of offers does not matter.
    pub fn offer(&mut self, key: [u8; 32], votes: u64, is_active: bool) {
        if !is_active || votes == 0 {
            return;
        }
        let candidate = Candidate { key, votes };

        let mut pos = self.len;
        while pos > 0 && candidate.ranks_before(&self.entries[pos - 1]) {
            pos -= 1;
        }
        if pos >= MAX_ELECTED_PRODUCERS {
            return;
        }

        let last = if self.len < MAX_ELECTED_PRODUCERS {
            self.len
        } else {
            MAX_ELECTED_PRODUCERS - 1
        };
        let mut i = last;
        while i > pos {
            self.entries[i] = self.entries[i - 1];
            i -= 1;
        }
        self.entries[pos] = candidate;
        if self.len < MAX_ELECTED_PRODUCERS {
            self.len += 1;
        }
    }

    /// The schedule to publish, sorted by account, or `None` when fewer
    /// producers qualify than the schedule currently in force.
    pub fn into_schedule(mut self, last_schedule_size: usize) -> Option<ElectedSchedule> {
        if self.len < last_schedule_size {
            return None;
        }
        self.entries[..self.len].sort_unstable_by(|a, b| a.key.cmp(&b.key));
        Some(ElectedSchedule {
            entries: self.entries,
            len: self.len,
        })
    }
}

pub struct ElectedSchedule {
    entries: [Candidate; MAX_ELECTED_PRODUCERS],
    len: usize,
}

impl ElectedSchedule {
    pub fn producers(&self) -> &[Candidate] {
        &self.entries[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
