// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The deprecated `{ direction, value }` offset logs a warning on every
//! evaluation that uses it.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kurbo::Rect;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use understory_visibility::{
    Edge, EdgeInsets, OffsetOptions, PartialVisibility, VisibilityPolicy, evaluate,
};

const VIEWPORT: Rect = Rect::new(0.0, 0.0, 100.0, 100.0);

#[derive(Clone, Default)]
struct CountWarnings(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for CountWarnings {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }
}

fn count_warnings(f: impl FnOnce()) -> usize {
    let counter = CountWarnings::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    tracing::subscriber::with_default(subscriber, f);
    counter.0.load(Ordering::Relaxed)
}

fn policy(offset: OffsetOptions) -> VisibilityPolicy {
    VisibilityPolicy {
        partial_visibility: PartialVisibility::Off,
        offset: offset.resolve(),
        min_top_value: 0.0,
    }
}

#[test]
fn legacy_offset_warns_on_every_evaluation() {
    let legacy = policy(OffsetOptions::Legacy {
        direction: Edge::Top,
        value: 5.0,
    });
    let element = Rect::new(10.0, 10.0, 20.0, 20.0);

    let warnings = count_warnings(|| {
        for _ in 0..3 {
            assert!(evaluate(element, VIEWPORT, &legacy).is_visible);
        }
    });
    assert_eq!(warnings, 3);
}

#[test]
fn inset_offset_does_not_warn() {
    let insets = policy(
        EdgeInsets {
            top: 5.0,
            ..EdgeInsets::ZERO
        }
        .into(),
    );
    let element = Rect::new(10.0, 10.0, 20.0, 20.0);

    let warnings = count_warnings(|| {
        assert!(evaluate(element, VIEWPORT, &insets).is_visible);
    });
    assert_eq!(warnings, 0);
}
