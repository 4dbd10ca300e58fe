// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use smallvec::SmallVec;
use understory_timing::{RateLimit, RateLimiter, TimerId, TimerQueue};

use crate::edge::VisibilityRect;
use crate::evaluate::{evaluate, viewport_rect};
use crate::host::{EventKind, EventTarget, SensorHost};
use crate::options::SensorConfig;
use crate::state::VisibilityState;

/// Watch lifecycle of a [`VisibilitySensor`].
///
/// [`VisibilitySensor::start`] and [`VisibilitySensor::stop`] are the only
/// transitions; both are idempotent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WatchPhase {
    /// No triggers are registered.
    #[default]
    Stopped,
    /// Triggers are registered but no evaluation has run since they were
    /// armed or since a reconfiguration reset the stored visibility. With
    /// `delayed_call` this lasts until the first trigger fires.
    Starting,
    /// Triggers are registered and the element has been evaluated.
    Watching,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Trigger {
    Interval,
    Event(EventKind),
}

#[derive(Clone, Debug)]
struct EventWatch<E> {
    kind: EventKind,
    target: EventTarget<E>,
    limiter: RateLimiter,
}

/// Watches one element and reports when it enters or leaves its containment
/// region.
///
/// The sensor owns its watch state, its timers, and the change callback. The
/// host supplies geometry and listener registration through [`SensorHost`],
/// forwards scroll/resize events to [`handle_event`](Self::handle_event), and
/// calls [`advance`](Self::advance) when [`next_deadline`](Self::next_deadline)
/// is reached. All work happens inside those calls, so evaluations never
/// overlap and a stopped sensor never runs a stale timer.
///
/// `on_change` receives `(is_visible, visibility_rect)` exactly once per
/// transition of `is_visible`.
pub struct VisibilitySensor<E, F> {
    config: SensorConfig<E>,
    on_change: F,
    element: Option<E>,
    mounted: bool,
    phase: WatchPhase,
    state: VisibilityState,
    timers: TimerQueue<Trigger>,
    interval: Option<TimerId>,
    listeners: SmallVec<[EventWatch<E>; 2]>,
}

impl<E, F> VisibilitySensor<E, F>
where
    E: Clone,
    F: FnMut(bool, VisibilityRect),
{
    /// Creates a stopped, unmounted sensor.
    pub fn new(config: SensorConfig<E>, on_change: F) -> Self {
        Self {
            config,
            on_change,
            element: None,
            mounted: false,
            phase: WatchPhase::Stopped,
            state: VisibilityState::new(),
            timers: TimerQueue::new(),
            interval: None,
            listeners: SmallVec::new(),
        }
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn config(&self) -> &SensorConfig<E> {
        &self.config
    }

    /// Returns the last reported state.
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Returns the last reported visibility, or `None` before the first
    /// evaluation since watching (re)started.
    #[must_use]
    pub fn is_visible(&self) -> Option<bool> {
        self.state.is_visible
    }

    /// Returns the per-edge flags of the last reported transition.
    #[must_use]
    pub fn visibility_rect(&self) -> VisibilityRect {
        self.state.visibility_rect
    }

    /// Returns the watch phase.
    #[must_use]
    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    /// Returns `true` while triggers are registered.
    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.phase != WatchPhase::Stopped
    }

    /// Returns `true` between [`mount`](Self::mount) and
    /// [`unmount`](Self::unmount).
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns the watched element handle, if any.
    #[must_use]
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Replaces the watched element handle.
    ///
    /// `None` means the element is not currently rendered; evaluations are
    /// skipped until a handle is supplied again.
    pub fn set_element(&mut self, element: Option<E>) {
        self.element = element;
    }

    /// Returns the earliest instant at which [`advance`](Self::advance) has
    /// work to do.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// Attaches the sensor to its rendered element and starts watching if
    /// the configuration is active.
    pub fn mount<H: SensorHost<E>>(&mut self, host: &mut H, element: Option<E>, now: u64) {
        self.element = element;
        self.mounted = true;
        if self.config.active {
            self.start(host, now);
        }
    }

    /// Stops watching and releases the element handle.
    pub fn unmount<H: SensorHost<E>>(&mut self, host: &mut H) {
        self.stop(host);
        self.element = None;
        self.mounted = false;
    }

    /// Applies a new configuration.
    ///
    /// While mounted, an active configuration resets the stored visibility
    /// and (re)starts watching, so the next evaluation is always reported;
    /// an inactive one stops watching. If the new configuration arms
    /// different triggers than the running ones, the old triggers are torn
    /// down first.
    pub fn set_config<H: SensorHost<E>>(&mut self, host: &mut H, config: SensorConfig<E>, now: u64)
    where
        E: PartialEq,
    {
        let rearm = self.is_watching() && !self.config.same_triggers(&config);
        self.config = config;
        if !self.mounted {
            return;
        }
        if self.config.active {
            if rearm {
                self.stop(host);
            }
            self.state.reset();
            if self.phase == WatchPhase::Watching {
                self.phase = WatchPhase::Starting;
            }
            self.start(host, now);
        } else {
            self.stop(host);
        }
    }

    /// Arms every enabled trigger and, unless `delayed_call` is set, checks
    /// visibility immediately.
    ///
    /// Does nothing if the sensor is already watching.
    pub fn start<H: SensorHost<E>>(&mut self, host: &mut H, now: u64) {
        if self.phase != WatchPhase::Stopped {
            return;
        }
        self.phase = WatchPhase::Starting;

        if self.config.interval_check {
            let id = self
                .timers
                .schedule_repeating(now, self.config.interval_delay, Trigger::Interval);
            self.interval = Some(id);
        }
        if self.config.scroll_check {
            let target = match &self.config.containment {
                Some(containment) => EventTarget::Element(containment.clone()),
                None => EventTarget::Viewport,
            };
            self.listen(host, EventKind::Scroll, target, self.config.scroll_limit);
        }
        if self.config.resize_check {
            self.listen(
                host,
                EventKind::Resize,
                EventTarget::Viewport,
                self.config.resize_limit,
            );
        }

        tracing::debug!(
            interval = self.interval.is_some(),
            listeners = self.listeners.len(),
            delayed = self.config.delayed_call,
            "visibility sensor started"
        );

        if !self.config.delayed_call {
            self.check(host);
        }
    }

    /// Cancels the interval, every pending debounced or throttled check, and
    /// removes all listeners.
    ///
    /// Safe to call when not watching; [`start`](Self::start) may be called
    /// again afterwards.
    pub fn stop<H: SensorHost<E>>(&mut self, host: &mut H) {
        if let Some(id) = self.interval.take() {
            self.timers.cancel(id);
        }
        for mut watch in self.listeners.drain(..) {
            watch.limiter.cancel(&mut self.timers);
            host.remove_listener(&watch.target, watch.kind);
        }
        debug_assert!(self.timers.is_empty(), "stopped sensor left timers behind");
        if self.phase != WatchPhase::Stopped {
            tracing::debug!("visibility sensor stopped");
        }
        self.phase = WatchPhase::Stopped;
    }

    /// Feeds a host event into its debounce or throttle gate.
    ///
    /// Returns `false` if no listener for `kind` is registered, for example
    /// after [`stop`](Self::stop).
    pub fn handle_event(&mut self, kind: EventKind, now: u64) -> bool {
        let Some(watch) = self.listeners.iter_mut().find(|watch| watch.kind == kind) else {
            return false;
        };
        watch
            .limiter
            .trigger(&mut self.timers, now, Trigger::Event(kind));
        true
    }

    /// Runs every check that is due at `now`.
    ///
    /// Returns the number of checks performed.
    pub fn advance<H: SensorHost<E>>(&mut self, host: &H, now: u64) -> usize {
        let mut checks = 0;
        while let Some(expired) = self.timers.pop_due(now) {
            if let Trigger::Event(kind) = expired.payload {
                if let Some(watch) = self.listeners.iter_mut().find(|watch| watch.kind == kind) {
                    watch.limiter.on_fired(expired.id);
                }
            }
            self.check(host);
            checks += 1;
        }
        checks
    }

    /// Evaluates visibility now and notifies `on_change` on a transition.
    ///
    /// Without an element handle this is a no-op that returns the prior
    /// state.
    pub fn check<H: SensorHost<E>>(&mut self, host: &H) -> VisibilityState {
        let Some(element) = &self.element else {
            return self.state;
        };
        if self.phase == WatchPhase::Starting {
            self.phase = WatchPhase::Watching;
        }

        let element_rect = host.bounding_rect(element);
        let containment = match &self.config.containment {
            Some(containment) => host.bounding_rect(containment),
            None => viewport_rect(host.viewport_size()),
        };
        let visibility = evaluate(element_rect, containment, &self.config.policy());

        if self.state.update(visibility) {
            tracing::debug!(
                is_visible = visibility.is_visible,
                top = visibility.visibility_rect.top,
                left = visibility.visibility_rect.left,
                bottom = visibility.visibility_rect.bottom,
                right = visibility.visibility_rect.right,
                "visibility changed"
            );
            (self.on_change)(visibility.is_visible, visibility.visibility_rect);
        }
        self.state
    }

    fn listen<H: SensorHost<E>>(
        &mut self,
        host: &mut H,
        kind: EventKind,
        target: EventTarget<E>,
        limit: RateLimit,
    ) {
        host.add_listener(&target, kind);
        self.listeners.push(EventWatch {
            kind,
            target,
            limiter: RateLimiter::new(limit),
        });
    }
}

impl<E: fmt::Debug, F> fmt::Debug for VisibilitySensor<E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilitySensor")
            .field("config", &self.config)
            .field("element", &self.element)
            .field("mounted", &self.mounted)
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("timers", &self.timers)
            .field("interval", &self.interval)
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}
