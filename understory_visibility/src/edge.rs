// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::str::FromStr;

/// One side of a rectangle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Edge {
    /// The top side (`y0`).
    Top,
    /// The right side (`x1`).
    Right,
    /// The bottom side (`y1`).
    Bottom,
    /// The left side (`x0`).
    Left,
}

impl Edge {
    /// All four edges, clockwise from the top.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Returns the lowercase name of this edge.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Edge {
    type Err = ParseEdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|edge| edge.name() == s)
            .ok_or(ParseEdgeError::new())
    }
}

/// Error returned when a string does not name an [`Edge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseEdgeError {
    _private: (),
}

impl ParseEdgeError {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl fmt::Display for ParseEdgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of `top`, `right`, `bottom` or `left`")
    }
}

impl core::error::Error for ParseEdgeError {}

/// Per-edge containment of an element within its containment region.
///
/// Each flag is `true` when the element does not cross that edge of the
/// (offset-adjusted) containment region.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityRect {
    /// `element.top >= containment.top`.
    pub top: bool,
    /// `element.left >= containment.left`.
    pub left: bool,
    /// `element.bottom <= containment.bottom`.
    pub bottom: bool,
    /// `element.right <= containment.right`.
    pub right: bool,
}

impl VisibilityRect {
    /// Returns the flag for a single edge.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> bool {
        match edge {
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
        }
    }

    /// Returns `true` when the element is contained on all four edges.
    #[must_use]
    pub const fn all(&self) -> bool {
        self.top && self.left && self.bottom && self.right
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        for edge in Edge::ALL {
            assert_eq!(edge.to_string().parse::<Edge>(), Ok(edge));
        }
        assert!("Top".parse::<Edge>().is_err());
        assert!("".parse::<Edge>().is_err());
    }

    #[test]
    fn rect_lookup_by_edge() {
        let rect = VisibilityRect {
            top: true,
            left: false,
            bottom: true,
            right: false,
        };
        assert!(rect.get(Edge::Top));
        assert!(!rect.get(Edge::Left));
        assert!(rect.get(Edge::Bottom));
        assert!(!rect.get(Edge::Right));
        assert!(!rect.all());
    }
}
