//! Signal derivation
//!
//! Pure functions from [`ScrollMetrics`] (and element rects) to normalized
//! signals. Nothing here holds state: a derived signal is a function of the
//! latest sample, recomputed on every event. The single exception in the
//! whole system (the odometer animating toward a target) lives in the
//! effects layer, not here.

use crate::metrics::ScrollMetrics;
use sightline_core::{Point, Rect};

/// Scroll distance past which floating controls become visible
pub const DEFAULT_THRESHOLD_PX: f32 = 500.0;

/// Default inset of the floating-control anchor from the viewport's
/// bottom-right corner
pub const DEFAULT_ANCHOR_INSET_PX: f32 = 80.0;

/// Per-digit stagger of the odometer animation, in seconds
pub const ODOMETER_STAGGER_SECS: f32 = 0.15;

/// Visibility fraction at which the odometer arms and plays
pub const ODOMETER_VISIBILITY: f32 = 0.6;

/// Overall page progress in [0, 1]
///
/// Zero while the document has no scrollable height (content still loading),
/// so there is never a division by zero and a progress ring on an unloaded
/// page reads empty rather than full.
pub fn page_progress(metrics: &ScrollMetrics) -> f32 {
    if metrics.document_height > 0.0 {
        (metrics.scroll_top / metrics.document_height).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Whether the page has scrolled strictly past `threshold_px`
///
/// Strict: sitting exactly on the threshold is *not* past it.
pub fn past_threshold(metrics: &ScrollMetrics, threshold_px: f32) -> bool {
    metrics.scroll_top > threshold_px
}

/// The fixed on-screen anchor of a floating control cluster, inset from the
/// viewport's bottom-right corner
pub fn anchor_point(metrics: &ScrollMetrics, inset_px: f32) -> Point {
    Point::new(
        metrics.viewport_width - inset_px,
        metrics.viewport_height - inset_px,
    )
}

/// Whether `point` currently falls inside any of the candidate rects
///
/// Candidate rects move as the page scrolls, so membership is recomputed
/// from fresh rects on every scroll/resize event.
pub fn point_in_any<'a>(point: Point, rects: impl IntoIterator<Item = &'a Rect>) -> bool {
    rects.into_iter().any(|r| r.contains(point))
}

/// Fraction of `element` currently visible inside the viewport, in [0, 1]
pub fn intersection_ratio(element: &Rect, metrics: &ScrollMetrics) -> f32 {
    element.visible_fraction(&metrics.viewport_rect())
}

/// Per-digit vertical offsets for an odometer showing `value`
///
/// Digits are most-significant first and padded to `width` with leading
/// zeros (the original rendered fixed-width digit columns, so `42` at width
/// 3 is `042`). Digit `d` rolls its strip up by `d * digit_height`.
pub fn digit_offsets(value: u64, width: usize, digit_height: f32) -> Vec<f32> {
    let mut digits = Vec::with_capacity(width.max(1));
    let mut rest = value;
    loop {
        digits.push((rest % 10) as u8);
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    while digits.len() < width {
        digits.push(0);
    }
    digits.reverse();
    digits
        .into_iter()
        .map(|d| -(d as f32) * digit_height)
        .collect()
}

/// Stagger delays for `count` sequential units: `i * step_secs`
pub fn stagger_delays(count: usize, step_secs: f32) -> Vec<f32> {
    (0..count).map(|i| i as f32 * step_secs).collect()
}
