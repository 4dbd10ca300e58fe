// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility under the deprecated `{ direction, value }` offset.
//!
//! Only the named edge of the containment region is shifted inward by
//! `value`. All four comparisons are strict, so an element touching any
//! boundary does not count as visible here.

use kurbo::Rect;

use crate::edge::Edge;
use crate::options::LegacyOffset;

/// Returns `true` when `element` lies strictly inside `containment` with the
/// offset edge moved inward by `offset.value`.
#[must_use]
pub fn is_visible_with_offset(offset: LegacyOffset, element: Rect, containment: Rect) -> bool {
    let LegacyOffset { direction, value } = offset;
    let mut region = containment;
    match direction {
        Edge::Top => region.y0 += value,
        Edge::Left => region.x0 += value,
        Edge::Bottom => region.y1 -= value,
        Edge::Right => region.x1 -= value,
    }
    region.y0 < element.y0
        && region.x0 < element.x0
        && region.y1 > element.y1
        && region.x1 > element.x1
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

    fn offset(direction: Edge, value: f64) -> LegacyOffset {
        LegacyOffset { direction, value }
    }

    #[test]
    fn only_the_named_edge_moves() {
        let element = Rect::new(10.0, 30.0, 90.0, 90.0);
        assert!(is_visible_with_offset(offset(Edge::Top, 20.0), element, VIEWPORT));
        assert!(!is_visible_with_offset(offset(Edge::Top, 30.0), element, VIEWPORT));
        assert!(is_visible_with_offset(offset(Edge::Bottom, 5.0), element, VIEWPORT));
        assert!(!is_visible_with_offset(offset(Edge::Bottom, 10.0), element, VIEWPORT));
        assert!(!is_visible_with_offset(offset(Edge::Left, 10.0), element, VIEWPORT));
        assert!(!is_visible_with_offset(offset(Edge::Right, 10.0), element, VIEWPORT));
    }

    #[test]
    fn negative_value_extends_the_edge() {
        // 90px above the viewport, still visible with a -100 top offset.
        let element = Rect::new(10.0, -90.0, 20.0, -80.0);
        assert!(is_visible_with_offset(offset(Edge::Top, -100.0), element, VIEWPORT));
        assert!(!is_visible_with_offset(offset(Edge::Top, 0.0), element, VIEWPORT));
    }

    #[test]
    fn touching_a_boundary_is_not_visible() {
        let element = Rect::new(0.0, 10.0, 50.0, 50.0);
        assert!(!is_visible_with_offset(offset(Edge::Top, 0.0), element, VIEWPORT));
    }
}
