// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Rect, Size};

use crate::edge::VisibilityRect;
use crate::legacy::is_visible_with_offset;
use crate::options::{Offset, PartialVisibility};

/// The configuration inputs of [`evaluate`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VisibilityPolicy {
    /// Partial visibility mode.
    pub partial_visibility: PartialVisibility,
    /// Containment offset.
    pub offset: Offset,
    /// Minimum top-edge penetration in partial mode; `0` disables it.
    pub min_top_value: f64,
}

/// Result of a single visibility evaluation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct Visibility {
    /// Whether the element counts as visible under the policy.
    pub is_visible: bool,
    /// Per-edge containment against the offset-adjusted region.
    pub visibility_rect: VisibilityRect,
}

/// Returns the containment region implied by a viewport of the given size.
#[must_use]
pub fn viewport_rect(size: Size) -> Rect {
    Rect::new(0.0, 0.0, size.width, size.height)
}

/// Evaluates the visibility of `element` within `containment`.
///
/// Both rectangles are in the same viewport-relative space, with `y0` as the
/// top and `x0` as the left edge. Neither is normalized, so inverted regions
/// produced by large offsets are handled without panicking.
///
/// When the policy carries the deprecated `{ direction, value }` offset, a
/// warning is logged on every call and the final decision comes from the
/// single-edge legacy test; the per-edge rect is still computed as usual.
#[must_use]
pub fn evaluate(element: Rect, containment: Rect, policy: &VisibilityPolicy) -> Visibility {
    let region = policy.offset.insets.shrink(containment);

    let visibility_rect = VisibilityRect {
        top: element.y0 >= region.y0,
        left: element.x0 >= region.x0,
        bottom: element.y1 <= region.y1,
        right: element.x1 <= region.x1,
    };

    let mut is_visible = visibility_rect.all();

    if policy.partial_visibility.is_enabled() {
        let partial = match policy.partial_visibility {
            PartialVisibility::Edge(edge) => visibility_rect.get(edge),
            _ => {
                element.y0 <= region.y1
                    && element.y1 >= region.y0
                    && element.x0 <= region.x1
                    && element.x1 >= region.x0
            }
        };
        is_visible = if policy.min_top_value != 0.0 {
            partial && element.y0 <= region.y1 - policy.min_top_value
        } else {
            partial
        };
    }

    if let Some(legacy) = policy.offset.legacy {
        tracing::warn!(
            direction = %legacy.direction,
            value = legacy.value,
            "offset `direction`/`value` is deprecated; use per-edge insets such as `{{ {}: {} }}` instead",
            legacy.direction,
            legacy.value
        );
        is_visible = is_visible_with_offset(legacy, element, region);
    }

    Visibility {
        is_visible,
        visibility_rect,
    }
}
