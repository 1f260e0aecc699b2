// Deferred actions keyed on the simulation clock.
//
// Every timed transition (ability windows, buffs, burn ticks, thaws) goes through one
// queue so a fake clock drives all of them deterministically.

use crate::domain::abilities::Ability;
use crate::domain::entities::EntityId;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, PartialEq)]
pub enum DeferredAction {
    /// Duration window of an ability closed.
    AbilityEnded(Ability),
    /// Cooldown of an ability elapsed.
    AbilityReady(Ability),
    /// One damage-over-time tick; `remaining` counts this one.
    Burn {
        target: EntityId,
        remaining: u8,
        damage: f32,
    },
    /// Freeze wore off; restore the speed captured when it was applied.
    Thaw {
        target: EntityId,
        original_speed: f32,
    },
    SpeedBoostEnded,
    SpreadShotEnded,
    UltimateEnded,
}

#[derive(Debug)]
struct Scheduled {
    due_ms: u64,
    seq: u64,
    action: DeferredAction,
}

// Order by due time, then by scheduling order so ties stay FIFO.
impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due_ms, self.seq).cmp(&(other.due_ms, other.seq))
    }
}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.seq == other.seq
    }
}

impl Eq for Scheduled {}

/// Min-heap of deferred actions.
#[derive(Debug, Default)]
pub struct Timeline {
    queue: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: u64, action: DeferredAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Scheduled {
            due_ms,
            seq,
            action,
        }));
    }

    /// Pops the earliest action due at or before `now_ms`, with its due time.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(u64, DeferredAction)> {
        if self.queue.peek()?.0.due_ms > now_ms {
            return None;
        }
        self.queue
            .pop()
            .map(|Reverse(entry)| (entry.due_ms, entry.action))
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.peek().map(|Reverse(entry)| entry.due_ms)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending actions in no particular order.
    pub fn pending(&self) -> impl Iterator<Item = &DeferredAction> {
        self.queue.iter().map(|Reverse(entry)| &entry.action)
    }
}
