// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounce and throttle gates on top of [`TimerQueue`].

use crate::{TimerId, TimerQueue};

/// How a burst of events is collapsed into deferred invocations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RateLimit {
    /// Run once the given number of milliseconds pass without another event.
    Debounce(u64),
    /// Run at most once per window of the given number of milliseconds.
    ///
    /// The first event in a window schedules the invocation; later events in
    /// the same window are dropped.
    Throttle(u64),
}

impl RateLimit {
    /// Picks a mode from a debounce delay and a throttle window.
    ///
    /// A non-negative `throttle` selects [`RateLimit::Throttle`]; any negative
    /// value (conventionally `-1`) selects [`RateLimit::Debounce`] with
    /// `delay`. Negative delays are treated as zero.
    #[must_use]
    pub fn from_delay_and_throttle(delay: i64, throttle: i64) -> Self {
        match u64::try_from(throttle) {
            Ok(window) => Self::Throttle(window),
            Err(_) => Self::Debounce(u64::try_from(delay).unwrap_or(0)),
        }
    }

    /// Returns the delay or window in milliseconds.
    #[must_use]
    pub fn millis(self) -> u64 {
        match self {
            Self::Debounce(ms) | Self::Throttle(ms) => ms,
        }
    }
}

/// Tracks the single pending invocation of a [`RateLimit`].
///
/// The limiter does not own a queue; it schedules into whichever
/// [`TimerQueue`] the caller passes, so several limiters can share one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimiter {
    limit: RateLimit,
    pending: Option<TimerId>,
}

impl RateLimiter {
    /// Creates an idle limiter.
    #[must_use]
    pub const fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            pending: None,
        }
    }

    /// Returns the configured limit.
    #[must_use]
    pub fn limit(&self) -> RateLimit {
        self.limit
    }

    /// Returns the pending invocation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    /// Records an event.
    ///
    /// Returns the timer that now represents the pending invocation, or `None`
    /// if a throttled event was dropped because one is already pending.
    pub fn trigger<T>(&mut self, queue: &mut TimerQueue<T>, now: u64, payload: T) -> Option<TimerId> {
        match self.limit {
            RateLimit::Debounce(delay) => {
                if let Some(previous) = self.pending.take() {
                    queue.cancel(previous);
                }
                let id = queue.schedule_once(now, delay, payload);
                self.pending = Some(id);
                Some(id)
            }
            RateLimit::Throttle(window) => {
                if self.pending.is_some() {
                    return None;
                }
                let id = queue.schedule_once(now, window, payload);
                self.pending = Some(id);
                Some(id)
            }
        }
    }

    /// Notifies the limiter that timer `id` fired.
    ///
    /// Returns `true` if `id` was this limiter's pending invocation.
    pub fn on_fired(&mut self, id: TimerId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancels the pending invocation, if any.
    ///
    /// Returns `true` if something was cancelled.
    pub fn cancel<T>(&mut self, queue: &mut TimerQueue<T>) -> bool {
        self.pending.take().is_some_and(|id| queue.cancel(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_sentinel_selects_mode() {
        assert_eq!(
            RateLimit::from_delay_and_throttle(250, -1),
            RateLimit::Debounce(250)
        );
        assert_eq!(
            RateLimit::from_delay_and_throttle(250, 0),
            RateLimit::Throttle(0)
        );
        assert_eq!(
            RateLimit::from_delay_and_throttle(250, 40),
            RateLimit::Throttle(40)
        );
        assert_eq!(
            RateLimit::from_delay_and_throttle(-10, -5),
            RateLimit::Debounce(0)
        );
        assert_eq!(RateLimit::Throttle(40).millis(), 40);
    }

    #[test]
    fn debounce_restarts_on_every_event() {
        let mut queue = TimerQueue::new();
        let mut limiter = RateLimiter::new(RateLimit::Debounce(100));

        let first = limiter.trigger(&mut queue, 0, ()).unwrap();
        let second = limiter.trigger(&mut queue, 50, ()).unwrap();
        assert_ne!(first, second);
        assert!(!queue.is_scheduled(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.next_deadline(), Some(150));

        assert!(queue.pop_due(149).is_none());
        let expired = queue.pop_due(150).unwrap();
        assert!(limiter.on_fired(expired.id));
        assert!(limiter.pending().is_none());
    }

    #[test]
    fn throttle_drops_events_while_pending() {
        let mut queue = TimerQueue::new();
        let mut limiter = RateLimiter::new(RateLimit::Throttle(100));

        let id = limiter.trigger(&mut queue, 0, ()).unwrap();
        assert!(limiter.trigger(&mut queue, 10, ()).is_none());
        assert!(limiter.trigger(&mut queue, 90, ()).is_none());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.deadline(id), Some(100));

        let expired = queue.pop_due(100).unwrap();
        assert!(limiter.on_fired(expired.id));

        // The next window starts with the next event.
        let next = limiter.trigger(&mut queue, 120, ()).unwrap();
        assert_eq!(queue.deadline(next), Some(220));
    }

    #[test]
    fn zero_throttle_fires_on_next_drain() {
        let mut queue = TimerQueue::new();
        let mut limiter = RateLimiter::new(RateLimit::Throttle(0));

        limiter.trigger(&mut queue, 7, ());
        assert_eq!(queue.next_deadline(), Some(7));
    }

    #[test]
    fn cancel_removes_pending_invocation() {
        let mut queue = TimerQueue::new();
        let mut limiter = RateLimiter::new(RateLimit::Debounce(100));

        assert!(!limiter.cancel(&mut queue));
        let id = limiter.trigger(&mut queue, 0, ()).unwrap();
        assert!(limiter.cancel(&mut queue));
        assert!(!queue.is_scheduled(id));
        assert!(queue.pop_due(1_000).is_none());
    }

    #[test]
    fn foreign_timer_does_not_clear_pending() {
        let mut queue = TimerQueue::new();
        let other = queue.schedule_once(0, 1, ());
        let mut limiter = RateLimiter::new(RateLimit::Throttle(10));
        limiter.trigger(&mut queue, 0, ());

        assert!(!limiter.on_fired(other));
        assert!(limiter.pending().is_some());
    }
}
