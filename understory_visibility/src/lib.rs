// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_visibility --heading-base-level=0

//! Understory Visibility: know when an element enters or leaves view.
//!
//! This crate decides whether a rendered element is inside (or partially
//! inside) a containment region, either the viewport or a designated
//! container element, and reports each change exactly once. Typical uses are
//! lazy loading, impression tracking, and reveal-on-scroll effects.
//!
//! It is split into a pure evaluator and a small driver:
//!
//! - [`evaluate`]: given the element's bounds, the containment bounds, and a
//!   [`VisibilityPolicy`], computes a [`Visibility`] (the overall decision plus
//!   a per-edge [`VisibilityRect`]).
//! - [`VisibilitySensor`]: owns the watch state, the change callback, and the
//!   triggers (interval polling plus debounced or throttled scroll/resize
//!   re-checks), and walks the `Stopped → Starting → Watching` lifecycle.
//!
//! The crate does **not** own a clock, a scene graph, or an event loop. Hosts
//! implement [`SensorHost`] for geometry queries and listener registration,
//! forward events to [`VisibilitySensor::handle_event`], and call
//! [`VisibilitySensor::advance`] whenever [`VisibilitySensor::next_deadline`]
//! passes. Timers come from `understory_timing`.
//!
//! ## Evaluating directly
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_visibility::{PartialVisibility, VisibilityPolicy, evaluate};
//!
//! let viewport = Rect::new(0.0, 0.0, 100.0, 100.0);
//! // Straddles the top edge of the viewport.
//! let element = Rect::new(0.0, -5.0, 10.0, 5.0);
//!
//! let full = evaluate(element, viewport, &VisibilityPolicy::default());
//! assert!(!full.is_visible);
//! assert!(!full.visibility_rect.top);
//!
//! let partial = VisibilityPolicy {
//!     partial_visibility: PartialVisibility::Any,
//!     ..VisibilityPolicy::default()
//! };
//! assert!(evaluate(element, viewport, &partial).is_visible);
//! ```
//!
//! ## Driving a sensor
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_visibility::{
//!     EventKind, EventTarget, SensorHost, SensorOptions, VisibilitySensor,
//! };
//!
//! struct Window {
//!     element: Rect,
//! }
//!
//! impl SensorHost<u32> for Window {
//!     fn bounding_rect(&self, _element: &u32) -> Rect {
//!         self.element
//!     }
//!     fn viewport_size(&self) -> Size {
//!         Size::new(100.0, 100.0)
//!     }
//!     fn add_listener(&mut self, _target: &EventTarget<u32>, _kind: EventKind) {}
//!     fn remove_listener(&mut self, _target: &EventTarget<u32>, _kind: EventKind) {}
//! }
//!
//! let mut window = Window { element: Rect::new(0.0, 200.0, 10.0, 210.0) };
//! let mut changes = Vec::new();
//! let config = SensorOptions::new().with_interval_delay(100).normalize();
//! let mut sensor = VisibilitySensor::new(config, |visible, _rect| changes.push(visible));
//!
//! // Mounting checks immediately: below the fold.
//! sensor.mount(&mut window, Some(1), 0);
//! assert_eq!(sensor.is_visible(), Some(false));
//!
//! // Scrolled into view; the next interval tick notices.
//! window.element = Rect::new(0.0, 20.0, 10.0, 30.0);
//! assert_eq!(sensor.next_deadline(), Some(100));
//! sensor.advance(&window, 100);
//! assert_eq!(sensor.is_visible(), Some(true));
//!
//! sensor.unmount(&mut window);
//! drop(sensor);
//! assert_eq!(changes, [false, true]);
//! ```
//!
//! ## Offsets
//!
//! Offsets shrink the containment region inward per edge
//! ([`EdgeInsets`]). The deprecated `{ direction, value }` shape
//! ([`OffsetOptions::Legacy`]) is still accepted; it is resolved into the same
//! [`Offset`] type, logs a `tracing` warning on every evaluation, and decides
//! visibility with a strict single-edge test.
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo`, `tracing` and `understory_timing`.
//! - `libm`: use Kurbo's `libm` backend in `no_std` builds.
//! - `serde`: (de)serialize [`SensorOptions`] and evaluation results.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod edge;
mod evaluate;
mod host;
mod legacy;
mod options;
mod sensor;
mod state;

pub use edge::{Edge, ParseEdgeError, VisibilityRect};
pub use evaluate::{Visibility, VisibilityPolicy, evaluate, viewport_rect};
pub use host::{EventKind, EventTarget, SensorHost};
pub use legacy::is_visible_with_offset;
pub use options::{
    DEFAULT_EVENT_DELAY, DEFAULT_INTERVAL_DELAY, EdgeInsets, LegacyOffset, Offset, OffsetOptions,
    ParsePartialVisibilityError, PartialVisibility, SensorConfig, SensorOptions,
    THROTTLE_DISABLED,
};
pub use sensor::{VisibilitySensor, WatchPhase};
pub use state::VisibilityState;
pub use understory_timing::RateLimit;
