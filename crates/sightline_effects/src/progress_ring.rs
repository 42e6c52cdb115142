//! Back-to-top progress ring
//!
//! A fixed-position button that appears once the page scrolls past the
//! threshold, wearing an SVG ring that fills with page progress. The ring
//! is a direct readout: `dashoffset = (1 - progress) * circumference`,
//! recomputed on every event with no easing, so it tracks the scrollbar 1:1.

use sightline_core::{SharedReactiveGraph, State};
use sightline_viewport::derive::{page_progress, past_threshold, DEFAULT_THRESHOLD_PX};
use sightline_viewport::ScrollMetrics;

/// Default ring radius in px (a 48px button with a 24px-radius ring)
pub const DEFAULT_RING_RADIUS: f32 = 24.0;

/// Driver for the back-to-top control
#[derive(Clone)]
pub struct ProgressRing {
    radius: f32,
    threshold_px: f32,
    visible: State<bool>,
    dashoffset: State<f32>,
}

impl ProgressRing {
    pub fn new(graph: &SharedReactiveGraph) -> Self {
        Self::with_settings(graph, DEFAULT_RING_RADIUS, DEFAULT_THRESHOLD_PX)
    }

    pub fn with_settings(graph: &SharedReactiveGraph, radius: f32, threshold_px: f32) -> Self {
        let circumference = std::f32::consts::TAU * radius;
        Self {
            radius,
            threshold_px,
            visible: State::new(graph, false),
            // Empty ring before the first sample
            dashoffset: State::new(graph, circumference),
        }
    }

    pub fn circumference(&self) -> f32 {
        std::f32::consts::TAU * self.radius
    }

    /// Recompute from a fresh sample
    pub fn on_metrics(&self, metrics: &ScrollMetrics) {
        let visible = past_threshold(metrics, self.threshold_px);
        let dashoffset = (1.0 - page_progress(metrics)) * self.circumference();

        // One consistent update per event: a subscriber never sees the new
        // offset with the old visibility.
        let visible_signal = self.visible.signal();
        let dash_signal = self.dashoffset.signal();
        let graph = self.visible_graph();
        graph.lock().unwrap().batch(|g| {
            g.set(visible_signal, visible);
            g.set(dash_signal, dashoffset);
        });
    }

    /// Whether the control renders at all
    pub fn visible(&self) -> &State<bool> {
        &self.visible
    }

    /// Current stroke-dashoffset for the ring path
    pub fn dashoffset(&self) -> &State<f32> {
        &self.dashoffset
    }

    fn visible_graph(&self) -> SharedReactiveGraph {
        self.visible.graph_handle()
    }
}
