// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI components frequently need "run this later" behavior: periodic polling,
//! debounced recomputation after a burst of scroll events, or throttled
//! handlers that run at most once per window. Platform timer APIs differ
//! wildly (browser `setTimeout`, winit `WaitUntil`, a game loop), so this crate
//! keeps the bookkeeping in plain data and lets the host own the clock.
//!
//! The core concepts are:
//!
//! - [`TimerQueue`]: one-shot and repeating timers keyed by [`TimerId`], with
//!   deadlines expressed in caller-supplied milliseconds.
//! - [`RateLimit`] / [`RateLimiter`]: debounce and throttle gates that schedule
//!   at most one pending invocation into a [`TimerQueue`].
//!
//! Hosts are expected to:
//!
//! - Feed a monotonic millisecond clock into every call (`now`).
//! - Arm a single platform wakeup for [`TimerQueue::next_deadline`].
//! - Drain expired timers with [`TimerQueue::pop_due`] when they wake.
//!
//! Because nothing here runs on its own, cancellation is synchronous: once a
//! timer is cancelled it can never be returned by [`TimerQueue::pop_due`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::{RateLimit, RateLimiter, TimerQueue};
//!
//! let mut queue = TimerQueue::new();
//! let mut debounce = RateLimiter::new(RateLimit::Debounce(250));
//!
//! // A burst of events: each one pushes the deadline out again.
//! debounce.trigger(&mut queue, 0, "scroll");
//! debounce.trigger(&mut queue, 100, "scroll");
//! debounce.trigger(&mut queue, 200, "scroll");
//! assert_eq!(queue.next_deadline(), Some(450));
//!
//! // Nothing is due until the quiet period has elapsed.
//! assert!(queue.pop_due(449).is_none());
//! let expired = queue.pop_due(450).unwrap();
//! assert!(debounce.on_fired(expired.id));
//! assert_eq!(expired.payload, "scroll");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod queue;
mod rate_limit;

pub use queue::{Expired, TimerId, TimerQueue};
pub use rate_limit::{RateLimit, RateLimiter};
