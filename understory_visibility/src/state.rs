// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::edge::VisibilityRect;
use crate::evaluate::Visibility;

/// The last reported visibility of a watched element.
///
/// Starts out unknown, so the first concrete evaluation always counts as a
/// change.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct VisibilityState {
    /// `None` until the first evaluation after a reset.
    pub is_visible: Option<bool>,
    /// Per-edge flags from the evaluation that last changed `is_visible`.
    pub visibility_rect: VisibilityRect,
}

impl VisibilityState {
    /// Creates an unknown state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            is_visible: None,
            visibility_rect: VisibilityRect {
                top: false,
                left: false,
                bottom: false,
                right: false,
            },
        }
    }

    /// Forgets the last result so the next evaluation is reported.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Records an evaluation.
    ///
    /// Returns `true` and stores the result only when `is_visible` differs
    /// from the stored value. Per-edge changes alone do not count.
    pub fn update(&mut self, visibility: Visibility) -> bool {
        if self.is_visible == Some(visibility.is_visible) {
            return false;
        }
        self.is_visible = Some(visibility.is_visible);
        self.visibility_rect = visibility.visibility_rect;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(is_visible: bool, top: bool) -> Visibility {
        Visibility {
            is_visible,
            visibility_rect: VisibilityRect {
                top,
                ..VisibilityRect::default()
            },
        }
    }

    #[test]
    fn first_result_is_always_a_change() {
        let mut state = VisibilityState::new();
        assert!(state.update(visible(false, false)));
        assert_eq!(state.is_visible, Some(false));
    }

    #[test]
    fn repeated_result_is_not_a_change() {
        let mut state = VisibilityState::new();
        assert!(state.update(visible(true, true)));
        assert!(!state.update(visible(true, false)));
        // The rect is kept from the transition.
        assert!(state.visibility_rect.top);
        assert!(state.update(visible(false, false)));
        assert!(!state.visibility_rect.top);
    }

    #[test]
    fn reset_reports_the_same_value_again() {
        let mut state = VisibilityState::new();
        assert!(state.update(visible(true, true)));
        state.reset();
        assert_eq!(state, VisibilityState::default());
        assert!(state.update(visible(true, true)));
    }
}
