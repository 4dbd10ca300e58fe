// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::collections::BinaryHeap;
use core::cmp::Reverse;
use core::fmt;

use hashbrown::HashMap;

/// Opaque handle for a timer scheduled in a [`TimerQueue`].
///
/// Identifiers are never reused within a single queue, so a stale handle can
/// be cancelled or compared safely after its timer has fired.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A timer returned by [`TimerQueue::pop_due`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expired<T> {
    /// The handle the timer was scheduled under.
    pub id: TimerId,
    /// The deadline the timer was due at, which may be earlier than `now`.
    pub deadline: u64,
    /// The payload supplied when the timer was scheduled.
    pub payload: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    deadline: u64,
    period: Option<u64>,
    payload: T,
}

/// Timer bookkeeping over a caller-supplied millisecond clock.
///
/// The queue never reads a clock itself. Every scheduling call takes `now`,
/// and expired timers are drained explicitly with [`TimerQueue::pop_due`].
/// Timers due at the same deadline are returned in the order they were
/// scheduled.
pub struct TimerQueue<T> {
    // (deadline, raw id); the id breaks ties in scheduling order.
    heap: BinaryHeap<Reverse<(u64, u64)>>,
    live: HashMap<TimerId, Entry<T>>,
    next_id: u64,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            live: HashMap::new(),
            next_id: 0,
        }
    }

    /// Schedules a timer that fires once, `delay` milliseconds after `now`.
    pub fn schedule_once(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.insert(now.saturating_add(delay), None, payload)
    }

    /// Schedules a timer that fires every `period` milliseconds, starting
    /// `period` milliseconds after `now`.
    ///
    /// A zero period is treated as one millisecond so that draining the queue
    /// always terminates.
    pub fn schedule_repeating(&mut self, now: u64, period: u64, payload: T) -> TimerId {
        let period = period.max(1);
        self.insert(now.saturating_add(period), Some(period), payload)
    }

    /// Cancels a timer.
    ///
    /// Returns `true` if the timer was still scheduled. Cancelling an unknown,
    /// expired, or already-cancelled timer is a no-op.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        if self.live.remove(&id).is_none() {
            return false;
        }
        self.heap.retain(|Reverse((_, raw))| *raw != id.0);
        tracing::trace!(timer = id.0, "cancelled timer");
        true
    }

    /// Returns `true` if `id` is still scheduled.
    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }

    /// Returns the next deadline of `id`, if it is still scheduled.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.live.get(&id).map(|entry| entry.deadline)
    }

    /// Returns the earliest deadline across all scheduled timers.
    ///
    /// Hosts typically arm one platform wakeup for this instant.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse((deadline, _))| *deadline)
    }

    /// Returns the number of scheduled timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Returns `true` if no timers are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Cancels every scheduled timer.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.live.clear();
    }

    /// Removes and returns the earliest timer whose deadline is at or before
    /// `now`.
    ///
    /// Repeating timers are re-armed at `deadline + period`. If the host woke
    /// up so late that the next deadline would also already be due, missed
    /// ticks are coalesced and the timer is re-armed at `now + period`.
    /// Deadlines saturate at `u64::MAX`; a repeating timer that can no longer
    /// be re-armed strictly after `now` fires one last time and is removed.
    pub fn pop_due(&mut self, now: u64) -> Option<Expired<T>>
    where
        T: Clone,
    {
        let &Reverse((deadline, raw)) = self.heap.peek()?;
        if deadline > now {
            return None;
        }
        self.heap.pop();
        let id = TimerId(raw);

        let period = self.live.get(&id)?.period;
        match period {
            Some(period) => {
                let mut next = deadline.saturating_add(period);
                if next <= now {
                    next = now.saturating_add(period);
                }
                if next <= now {
                    let entry = self.live.remove(&id)?;
                    tracing::trace!(timer = raw, deadline, "repeating timer exhausted the clock");
                    return Some(Expired {
                        id,
                        deadline,
                        payload: entry.payload,
                    });
                }
                let entry = self.live.get_mut(&id)?;
                entry.deadline = next;
                let payload = entry.payload.clone();
                self.heap.push(Reverse((next, raw)));
                Some(Expired {
                    id,
                    deadline,
                    payload,
                })
            }
            None => {
                let entry = self.live.remove(&id)?;
                Some(Expired {
                    id,
                    deadline,
                    payload: entry.payload,
                })
            }
        }
    }

    fn insert(&mut self, deadline: u64, period: Option<u64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.live.insert(
            id,
            Entry {
                deadline,
                period,
                payload,
            },
        );
        self.heap.push(Reverse((deadline, id.0)));
        tracing::trace!(timer = id.0, deadline, ?period, "scheduled timer");
        id
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for TimerQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("live", &self.live)
            .field("next_deadline", &self.next_deadline())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}
