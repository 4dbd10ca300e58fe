// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensor options and their normalized configuration.
//!
//! [`SensorOptions`] is the raw option set: every field may be left unset.
//! [`SensorOptions::normalize`] fills unset fields with the documented
//! defaults and resolves the two accepted offset shapes into one [`Offset`],
//! producing a [`SensorConfig`]. No range validation happens here; negative
//! delays and offsets are accepted and handled downstream without failing.

use core::fmt;
use core::str::FromStr;

use kurbo::Rect;
use understory_timing::RateLimit;

use crate::edge::Edge;
use crate::evaluate::VisibilityPolicy;

/// Default debounce delay for scroll and resize checks, in milliseconds.
pub const DEFAULT_EVENT_DELAY: i64 = 250;
/// Default polling period, in milliseconds.
pub const DEFAULT_INTERVAL_DELAY: i64 = 100;
/// Throttle value that selects debounce mode.
pub const THROTTLE_DISABLED: i64 = -1;

/// How much of the element must be inside the containment region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "PartialVisibilityRepr", into = "PartialVisibilityRepr")
)]
pub enum PartialVisibility {
    /// The element must be fully contained.
    #[default]
    Off,
    /// Any overlap with the containment region counts as visible.
    Any,
    /// Only the given edge's containment condition is required.
    Edge(Edge),
}

impl PartialVisibility {
    /// Returns `true` unless this is [`PartialVisibility::Off`].
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        !matches!(self, Self::Off)
    }
}

impl From<bool> for PartialVisibility {
    fn from(value: bool) -> Self {
        if value { Self::Any } else { Self::Off }
    }
}

impl From<Edge> for PartialVisibility {
    fn from(edge: Edge) -> Self {
        Self::Edge(edge)
    }
}

impl fmt::Display for PartialVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("false"),
            Self::Any => f.write_str("true"),
            Self::Edge(edge) => fmt::Display::fmt(edge, f),
        }
    }
}

impl FromStr for PartialVisibility {
    type Err = ParsePartialVisibilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" => Ok(Self::Off),
            "true" => Ok(Self::Any),
            _ => s
                .parse::<Edge>()
                .map(Self::Edge)
                .map_err(|_| ParsePartialVisibilityError { _private: () }),
        }
    }
}

/// Error returned when a string is not a valid [`PartialVisibility`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsePartialVisibilityError {
    _private: (),
}

impl fmt::Display for ParsePartialVisibilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected `true`, `false`, or an edge name")
    }
}

impl core::error::Error for ParsePartialVisibilityError {}

#[cfg(feature = "serde")]
#[derive(Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum PartialVisibilityRepr {
    Flag(bool),
    Edge(Edge),
}

#[cfg(feature = "serde")]
impl From<PartialVisibilityRepr> for PartialVisibility {
    fn from(repr: PartialVisibilityRepr) -> Self {
        match repr {
            PartialVisibilityRepr::Flag(flag) => flag.into(),
            PartialVisibilityRepr::Edge(edge) => Self::Edge(edge),
        }
    }
}

#[cfg(feature = "serde")]
impl From<PartialVisibility> for PartialVisibilityRepr {
    fn from(value: PartialVisibility) -> Self {
        match value {
            PartialVisibility::Off => Self::Flag(false),
            PartialVisibility::Any => Self::Flag(true),
            PartialVisibility::Edge(edge) => Self::Edge(edge),
        }
    }
}

/// Inward insets applied to the containment region.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct EdgeInsets {
    /// Added to the top edge.
    pub top: f64,
    /// Added to the left edge.
    pub left: f64,
    /// Subtracted from the bottom edge.
    pub bottom: f64,
    /// Subtracted from the right edge.
    pub right: f64,
}

impl EdgeInsets {
    /// No adjustment.
    pub const ZERO: Self = Self {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Shrinks `rect` by these insets.
    ///
    /// The result is not normalized: large or negative insets may produce an
    /// inverted rectangle, which simply never contains anything.
    #[must_use]
    pub fn shrink(&self, rect: Rect) -> Rect {
        Rect::new(
            rect.x0 + self.left,
            rect.y0 + self.top,
            rect.x1 - self.right,
            rect.y1 - self.bottom,
        )
    }
}

/// Deprecated single-edge offset, `{ direction, value }`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LegacyOffset {
    /// The edge the offset applies to.
    pub direction: Edge,
    /// How far the edge is moved inward.
    pub value: f64,
}

/// The raw `offset` option, in either accepted shape.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum OffsetOptions {
    /// Deprecated `{ direction, value }` shape.
    Legacy {
        /// The edge the offset applies to.
        direction: Edge,
        /// How far the edge is moved inward.
        value: f64,
    },
    /// Per-edge insets; unset edges are not adjusted.
    Insets {
        /// Inset of the top edge.
        top: Option<f64>,
        /// Inset of the left edge.
        left: Option<f64>,
        /// Inset of the bottom edge.
        bottom: Option<f64>,
        /// Inset of the right edge.
        right: Option<f64>,
    },
}

impl OffsetOptions {
    /// Per-edge insets with nothing set.
    pub const EMPTY: Self = Self::Insets {
        top: None,
        left: None,
        bottom: None,
        right: None,
    };

    /// Resolves this option into an [`Offset`].
    ///
    /// Unset and NaN insets become `0`.
    #[must_use]
    pub fn resolve(self) -> Offset {
        match self {
            Self::Legacy { direction, value } => Offset {
                insets: EdgeInsets::ZERO,
                legacy: Some(LegacyOffset { direction, value }),
            },
            Self::Insets {
                top,
                left,
                bottom,
                right,
            } => Offset {
                insets: EdgeInsets {
                    top: or_zero(top),
                    left: or_zero(left),
                    bottom: or_zero(bottom),
                    right: or_zero(right),
                },
                legacy: None,
            },
        }
    }
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<EdgeInsets> for OffsetOptions {
    fn from(insets: EdgeInsets) -> Self {
        Self::Insets {
            top: Some(insets.top),
            left: Some(insets.left),
            bottom: Some(insets.bottom),
            right: Some(insets.right),
        }
    }
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| !v.is_nan()).unwrap_or(0.0)
}

/// Resolved offset: one internal representation for both accepted shapes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Offset {
    /// Insets applied to the containment region before any test.
    pub insets: EdgeInsets,
    /// Present when the deprecated shape was supplied.
    pub legacy: Option<LegacyOffset>,
}

impl Offset {
    /// No adjustment.
    pub const NONE: Self = Self {
        insets: EdgeInsets::ZERO,
        legacy: None,
    };

    /// Returns `true` when the deprecated `{ direction, value }` shape is in use.
    #[must_use]
    pub const fn is_deprecated(&self) -> bool {
        self.legacy.is_some()
    }
}

/// Raw sensor options; unset fields take their defaults in
/// [`SensorOptions::normalize`].
///
/// `E` is the host's element handle, used for the optional `containment`
/// element.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", bound = "")
)]
pub struct SensorOptions<E> {
    /// Whether watching is enabled. Default `true`.
    pub active: Option<bool>,
    /// Partial visibility mode. Default [`PartialVisibility::Off`].
    pub partial_visibility: Option<PartialVisibility>,
    /// Containment insets. Default: none.
    pub offset: Option<OffsetOptions>,
    /// Minimum distance the top edge must reach above the containment
    /// bottom in partial mode. Default `0` (disabled).
    pub min_top_value: Option<f64>,
    /// Re-check on scroll of the containment element or viewport. Default `false`.
    pub scroll_check: Option<bool>,
    /// Scroll debounce delay in milliseconds. Default `250`.
    pub scroll_delay: Option<i64>,
    /// Scroll throttle window in milliseconds; `>= 0` selects throttling.
    /// Default `-1`.
    pub scroll_throttle: Option<i64>,
    /// Re-check on viewport resize. Default `false`.
    pub resize_check: Option<bool>,
    /// Resize debounce delay in milliseconds. Default `250`.
    pub resize_delay: Option<i64>,
    /// Resize throttle window in milliseconds; `>= 0` selects throttling.
    /// Default `-1`.
    pub resize_throttle: Option<i64>,
    /// Poll on a fixed interval. Default `true`.
    pub interval_check: Option<bool>,
    /// Polling period in milliseconds. Default `100`.
    pub interval_delay: Option<i64>,
    /// Skip the immediate check when watching starts. Default `false`.
    pub delayed_call: Option<bool>,
    /// Element whose bounds define the containment region. Default: the
    /// viewport.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub containment: Option<E>,
}

impl<E> Default for SensorOptions<E> {
    fn default() -> Self {
        Self {
            active: None,
            partial_visibility: None,
            offset: None,
            min_top_value: None,
            scroll_check: None,
            scroll_delay: None,
            scroll_throttle: None,
            resize_check: None,
            resize_delay: None,
            resize_throttle: None,
            interval_check: None,
            interval_delay: None,
            delayed_call: None,
            containment: None,
        }
    }
}

impl<E> SensorOptions<E> {
    /// Creates an option set with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `active`.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the partial visibility mode.
    #[must_use]
    pub fn with_partial_visibility(mut self, mode: impl Into<PartialVisibility>) -> Self {
        self.partial_visibility = Some(mode.into());
        self
    }

    /// Sets the containment offset.
    #[must_use]
    pub fn with_offset(mut self, offset: impl Into<OffsetOptions>) -> Self {
        self.offset = Some(offset.into());
        self
    }

    /// Sets `min_top_value`.
    #[must_use]
    pub fn with_min_top_value(mut self, value: f64) -> Self {
        self.min_top_value = Some(value);
        self
    }

    /// Enables or disables scroll checks.
    #[must_use]
    pub fn with_scroll_check(mut self, enabled: bool) -> Self {
        self.scroll_check = Some(enabled);
        self
    }

    /// Sets the scroll debounce delay.
    #[must_use]
    pub fn with_scroll_delay(mut self, delay: i64) -> Self {
        self.scroll_delay = Some(delay);
        self
    }

    /// Sets the scroll throttle window.
    #[must_use]
    pub fn with_scroll_throttle(mut self, throttle: i64) -> Self {
        self.scroll_throttle = Some(throttle);
        self
    }

    /// Enables or disables resize checks.
    #[must_use]
    pub fn with_resize_check(mut self, enabled: bool) -> Self {
        self.resize_check = Some(enabled);
        self
    }

    /// Sets the resize debounce delay.
    #[must_use]
    pub fn with_resize_delay(mut self, delay: i64) -> Self {
        self.resize_delay = Some(delay);
        self
    }

    /// Sets the resize throttle window.
    #[must_use]
    pub fn with_resize_throttle(mut self, throttle: i64) -> Self {
        self.resize_throttle = Some(throttle);
        self
    }

    /// Enables or disables interval polling.
    #[must_use]
    pub fn with_interval_check(mut self, enabled: bool) -> Self {
        self.interval_check = Some(enabled);
        self
    }

    /// Sets the polling period.
    #[must_use]
    pub fn with_interval_delay(mut self, delay: i64) -> Self {
        self.interval_delay = Some(delay);
        self
    }

    /// Sets `delayed_call`.
    #[must_use]
    pub fn with_delayed_call(mut self, delayed: bool) -> Self {
        self.delayed_call = Some(delayed);
        self
    }

    /// Sets the containment element.
    #[must_use]
    pub fn with_containment(mut self, containment: E) -> Self {
        self.containment = Some(containment);
        self
    }

    /// Fills unset options with their defaults.
    #[must_use]
    pub fn normalize(self) -> SensorConfig<E> {
        let interval_delay = self.interval_delay.unwrap_or(DEFAULT_INTERVAL_DELAY);
        SensorConfig {
            active: self.active.unwrap_or(true),
            partial_visibility: self.partial_visibility.unwrap_or_default(),
            offset: self.offset.unwrap_or_default().resolve(),
            min_top_value: or_zero(self.min_top_value),
            scroll_check: self.scroll_check.unwrap_or(false),
            scroll_limit: RateLimit::from_delay_and_throttle(
                self.scroll_delay.unwrap_or(DEFAULT_EVENT_DELAY),
                self.scroll_throttle.unwrap_or(THROTTLE_DISABLED),
            ),
            resize_check: self.resize_check.unwrap_or(false),
            resize_limit: RateLimit::from_delay_and_throttle(
                self.resize_delay.unwrap_or(DEFAULT_EVENT_DELAY),
                self.resize_throttle.unwrap_or(THROTTLE_DISABLED),
            ),
            interval_check: self.interval_check.unwrap_or(true),
            interval_delay: u64::try_from(interval_delay).unwrap_or(0).max(1),
            delayed_call: self.delayed_call.unwrap_or(false),
            containment: self.containment,
        }
    }
}

/// Normalized sensor configuration.
///
/// Built from [`SensorOptions::normalize`]; the [`Default`] value carries the
/// documented defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorConfig<E> {
    /// Whether watching is enabled.
    pub active: bool,
    /// Partial visibility mode.
    pub partial_visibility: PartialVisibility,
    /// Resolved containment offset.
    pub offset: Offset,
    /// Minimum top-edge penetration in partial mode; `0` disables it.
    pub min_top_value: f64,
    /// Re-check on scroll.
    pub scroll_check: bool,
    /// Debounce or throttle for scroll checks.
    pub scroll_limit: RateLimit,
    /// Re-check on viewport resize.
    pub resize_check: bool,
    /// Debounce or throttle for resize checks.
    pub resize_limit: RateLimit,
    /// Poll on a fixed interval.
    pub interval_check: bool,
    /// Polling period in milliseconds, at least `1`.
    pub interval_delay: u64,
    /// Skip the immediate check when watching starts.
    pub delayed_call: bool,
    /// Element whose bounds define the containment region.
    pub containment: Option<E>,
}

impl<E> SensorConfig<E> {
    /// Returns the parts of the configuration the evaluator needs.
    #[must_use]
    pub fn policy(&self) -> VisibilityPolicy {
        VisibilityPolicy {
            partial_visibility: self.partial_visibility,
            offset: self.offset,
            min_top_value: self.min_top_value,
        }
    }

    /// Returns `true` if both configurations arm the same triggers.
    #[must_use]
    pub fn same_triggers(&self, other: &Self) -> bool
    where
        E: PartialEq,
    {
        self.interval_check == other.interval_check
            && self.interval_delay == other.interval_delay
            && self.scroll_check == other.scroll_check
            && self.scroll_limit == other.scroll_limit
            && self.resize_check == other.resize_check
            && self.resize_limit == other.resize_limit
            && self.containment == other.containment
    }
}

impl<E> Default for SensorConfig<E> {
    fn default() -> Self {
        SensorOptions::default().normalize()
    }
}

impl<E> From<SensorOptions<E>> for SensorConfig<E> {
    fn from(options: SensorOptions<E>) -> Self {
        options.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = SensorConfig::<u32>::default();
        assert!(config.active);
        assert_eq!(config.partial_visibility, PartialVisibility::Off);
        assert_eq!(config.offset, Offset::NONE);
        assert_eq!(config.min_top_value, 0.0);
        assert!(!config.scroll_check);
        assert_eq!(config.scroll_limit, RateLimit::Debounce(250));
        assert!(!config.resize_check);
        assert_eq!(config.resize_limit, RateLimit::Debounce(250));
        assert!(config.interval_check);
        assert_eq!(config.interval_delay, 100);
        assert!(!config.delayed_call);
        assert_eq!(config.containment, None);
    }

    #[test]
    fn throttle_overrides_delay() {
        let config = SensorOptions::<u32>::new()
            .with_scroll_delay(10)
            .with_scroll_throttle(0)
            .with_resize_throttle(-1)
            .with_resize_delay(30)
            .normalize();
        assert_eq!(config.scroll_limit, RateLimit::Throttle(0));
        assert_eq!(config.resize_limit, RateLimit::Debounce(30));
    }

    #[test]
    fn nonsensical_numbers_are_accepted() {
        let config = SensorOptions::<u32>::new()
            .with_interval_delay(-20)
            .with_scroll_delay(-5)
            .with_min_top_value(f64::NAN)
            .with_offset(EdgeInsets {
                top: -10.0,
                left: f64::NAN,
                bottom: 1e9,
                right: 0.0,
            })
            .normalize();
        assert_eq!(config.interval_delay, 1);
        assert_eq!(config.scroll_limit, RateLimit::Debounce(0));
        assert_eq!(config.min_top_value, 0.0);
        assert_eq!(config.offset.insets.top, -10.0);
        assert_eq!(config.offset.insets.left, 0.0);
        assert_eq!(config.offset.insets.bottom, 1e9);
    }

    #[test]
    fn partial_insets_default_missing_edges() {
        let offset = OffsetOptions::Insets {
            top: Some(5.0),
            left: None,
            bottom: None,
            right: Some(2.0),
        }
        .resolve();
        assert_eq!(
            offset.insets,
            EdgeInsets {
                top: 5.0,
                left: 0.0,
                bottom: 0.0,
                right: 2.0,
            }
        );
        assert!(!offset.is_deprecated());
    }

    #[test]
    fn legacy_shape_is_flagged() {
        let offset = OffsetOptions::Legacy {
            direction: Edge::Bottom,
            value: 40.0,
        }
        .resolve();
        assert!(offset.is_deprecated());
        assert_eq!(offset.insets, EdgeInsets::ZERO);
        assert_eq!(
            offset.legacy,
            Some(LegacyOffset {
                direction: Edge::Bottom,
                value: 40.0,
            })
        );
    }

    #[test]
    fn insets_shrink_without_normalizing() {
        let insets = EdgeInsets {
            top: 10.0,
            left: 20.0,
            bottom: 30.0,
            right: 40.0,
        };
        assert_eq!(
            insets.shrink(Rect::new(0.0, 0.0, 100.0, 100.0)),
            Rect::new(20.0, 10.0, 60.0, 70.0)
        );

        let inverted = EdgeInsets {
            top: 80.0,
            bottom: 80.0,
            ..EdgeInsets::ZERO
        }
        .shrink(Rect::new(0.0, 0.0, 100.0, 100.0));
        assert!(inverted.y0 > inverted.y1);
    }

    #[test]
    fn partial_visibility_strings() {
        assert_eq!("false".parse(), Ok(PartialVisibility::Off));
        assert_eq!("true".parse(), Ok(PartialVisibility::Any));
        assert_eq!("left".parse(), Ok(PartialVisibility::Edge(Edge::Left)));
        assert!("maybe".parse::<PartialVisibility>().is_err());
        assert!(PartialVisibility::from(Edge::Top).is_enabled());
        assert!(!PartialVisibility::from(false).is_enabled());
    }

    #[test]
    fn trigger_comparison_ignores_evaluation_policy() {
        let base = SensorConfig::<u32>::default();
        let policy_only = SensorOptions::new()
            .with_partial_visibility(true)
            .with_min_top_value(5.0)
            .normalize();
        assert!(base.same_triggers(&policy_only));

        let containment = SensorOptions::new().with_containment(7).normalize();
        assert!(!base.same_triggers(&containment));

        let interval = SensorOptions::new().with_interval_delay(50).normalize();
        assert!(!base.same_triggers(&interval));
    }
}
