//! Pinned horizontal panel
//!
//! The "journey" section pins while the page scrolls through its range and
//! translates its content horizontally instead: vertical progress through
//! `[pin_start, pin_end]` maps 1:1 to a leftward offset across the
//! overflowing content width. Both ends clamp, so the panel rests at its
//! first frame before the range and at its last frame after it.

use sightline_core::{SharedReactiveGraph, State};
use sightline_viewport::ScrollMetrics;

/// Driver for a horizontally-pinned scroll panel
#[derive(Clone)]
pub struct PinnedPanel {
    /// Scroll position where pinning begins
    pin_start: f32,
    /// Scroll position where the panel releases
    pin_end: f32,
    /// Total width of the horizontal content strip
    content_width: f32,
    progress: State<f32>,
    offset_x: State<f32>,
}

impl PinnedPanel {
    pub fn new(
        graph: &SharedReactiveGraph,
        pin_start: f32,
        pin_end: f32,
        content_width: f32,
    ) -> Self {
        Self {
            pin_start,
            pin_end: pin_end.max(pin_start),
            content_width,
            progress: State::new(graph, 0.0),
            offset_x: State::new(graph, 0.0),
        }
    }

    /// Recompute pin progress and horizontal offset from a fresh sample
    pub fn on_metrics(&self, metrics: &ScrollMetrics) {
        let span = self.pin_end - self.pin_start;
        let progress = if span > 0.0 {
            ((metrics.scroll_top - self.pin_start) / span).clamp(0.0, 1.0)
        } else {
            // Degenerate range: past-the-post behaves as released
            if metrics.scroll_top >= self.pin_start {
                1.0
            } else {
                0.0
            }
        };

        let travel = (self.content_width - metrics.viewport_width).max(0.0);
        let offset_x = -progress * travel;

        let progress_signal = self.progress.signal();
        let offset_signal = self.offset_x.signal();
        self.progress.graph_handle().lock().unwrap().batch(|g| {
            g.set(progress_signal, progress);
            g.set(offset_signal, offset_x);
        });
    }

    /// Progress through the pin range, 0 at entry, 1 at release
    pub fn progress(&self) -> &State<f32> {
        &self.progress
    }

    /// Horizontal translation of the content strip (≤ 0)
    pub fn offset_x(&self) -> &State<f32> {
        &self.offset_x
    }

    /// Whether the panel is currently pinned (mid-range)
    pub fn is_pinned(&self, metrics: &ScrollMetrics) -> bool {
        metrics.scroll_top >= self.pin_start && metrics.scroll_top < self.pin_end
    }
}
