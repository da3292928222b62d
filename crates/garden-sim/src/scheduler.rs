//! Discrete-event scheduler driving the model clock.
//!
//! Deferred work is stored as `(fire_at, sequence)`-ordered entries in a
//! binary heap. The clock only moves when the owner pops due entries, so tests
//! control time completely. Entries due at the same instant fire in the order
//! they were scheduled.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Handle to a scheduled entry, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Entry in the scheduler queue.
#[derive(Debug)]
struct Entry<A> {
    fire_at: u64,
    seq: u64,
    id: TimerId,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: earliest fire time (then oldest) on top
        other
            .fire_at
            .cmp(&self.fire_at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of actions keyed by model time in milliseconds.
#[derive(Debug)]
pub struct Scheduler<A> {
    /// Current model time.
    now: u64,
    /// Monotonic counter for tie-breaking and timer ids.
    next_seq: u64,
    /// Pending entries.
    queue: BinaryHeap<Entry<A>>,
    /// Ids still live (not fired, not cancelled).
    pending: AHashSet<TimerId>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    /// Create an empty scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
            pending: AHashSet::new(),
        }
    }

    /// Current model time in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `action` to fire `delay_ms` after the current time.
    pub fn schedule_in(&mut self, delay_ms: u64, action: A) -> TimerId {
        self.schedule_at(self.now.saturating_add(delay_ms), action)
    }

    /// Schedule `action` at an absolute time (clamped to now).
    pub fn schedule_at(&mut self, fire_at: u64, action: A) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = TimerId(seq);
        self.queue.push(Entry {
            fire_at: fire_at.max(self.now),
            seq,
            id,
            action,
        });
        self.pending.insert(id);
        id
    }

    /// Cancel a pending entry. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.pending.remove(&id)
    }

    /// Check whether an entry is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains(&id)
    }

    /// Number of live entries.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Fire time of the next live entry.
    pub fn next_fire_time(&mut self) -> Option<u64> {
        self.discard_cancelled();
        self.queue.peek().map(|entry| entry.fire_at)
    }

    /// Pop the next entry due at or before `until`, moving the clock to its fire time.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerId, A)> {
        self.discard_cancelled();
        if self.queue.peek()?.fire_at > until {
            return None;
        }
        let entry = self.queue.pop()?;
        self.pending.remove(&entry.id);
        self.now = self.now.max(entry.fire_at);
        Some((entry.id, entry.action))
    }

    /// Move the clock forward to `time` (never backwards).
    pub fn advance_clock(&mut self, time: u64) {
        self.now = self.now.max(time);
    }

    fn discard_cancelled(&mut self) {
        while let Some(entry) = self.queue.peek() {
            if self.pending.contains(&entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}
