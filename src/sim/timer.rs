//! Deferred-callback facility
//!
//! The session's only suspension point is "run this N seconds from now on
//! the same logical thread". Entries carry the generation they were
//! scheduled under; a fire into a newer generation is discarded rather than
//! cancelled up front.

use std::cmp::Ordering;

/// Work a timer can fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Dispatch the next wave
    NextWave,
    /// One deferred link of a chain wave
    ChainSpawn,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    fire_at: f64,
    generation: u32,
    seq: u64,
    action: TimerAction,
}

/// Pending deferred actions, drained by the per-frame tick
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn schedule(&mut self, now: f64, delay: f64, generation: u32, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry {
            fire_at: now + delay,
            generation,
            seq,
            action,
        });
    }

    /// Remove and return every action due at `now` for the live generation,
    /// in firing order. Due entries from older generations are dropped on
    /// the way out.
    pub fn drain_due(&mut self, now: f64, generation: u32) -> Vec<TimerAction> {
        let mut due: Vec<Entry> = Vec::new();
        self.entries.retain(|e| {
            if e.fire_at <= now {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| {
            a.fire_at
                .partial_cmp(&b.fire_at)
                .unwrap_or(Ordering::Equal)
                .then(a.seq.cmp(&b.seq))
        });
        due.into_iter()
            .filter(|e| e.generation == generation)
            .map(|e| e.action)
            .collect()
    }

    /// Carry another queue's in-flight entries over (restart keeps them
    /// queued; the generation check retires them when they fire)
    pub fn adopt(&mut self, other: TimerQueue) {
        for mut entry in other.entries {
            entry.seq = self.next_seq;
            self.next_seq += 1;
            self.entries.push(entry);
        }
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
