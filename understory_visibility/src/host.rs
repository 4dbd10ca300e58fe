// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

/// Host events that can trigger a re-check.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The containment element or the viewport scrolled.
    Scroll,
    /// The viewport was resized.
    Resize,
}

/// Where a listener is registered.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget<E> {
    /// The global viewport (window).
    Viewport,
    /// A specific element, such as the containment element.
    Element(E),
}

/// Platform services the sensor reads geometry from and registers listeners
/// with.
///
/// Timers are not part of this trait: the sensor keeps its own
/// [`TimerQueue`](understory_timing::TimerQueue) and the host drives it through
/// [`VisibilitySensor::advance`](crate::VisibilitySensor::advance).
pub trait SensorHost<E> {
    /// Returns the bounding rectangle of `element` in viewport-relative
    /// coordinates.
    fn bounding_rect(&self, element: &E) -> Rect;

    /// Returns the size of the viewport.
    fn viewport_size(&self) -> Size;

    /// Starts delivering `kind` events from `target` to
    /// [`VisibilitySensor::handle_event`](crate::VisibilitySensor::handle_event).
    fn add_listener(&mut self, target: &EventTarget<E>, kind: EventKind);

    /// Stops delivering `kind` events from `target`.
    fn remove_listener(&mut self, target: &EventTarget<E>, kind: EventKind);
}
