//! Floating control cluster
//!
//! The fixed contact buttons pinned near the bottom-right corner. Two
//! signals drive them:
//!
//! - visibility: shown once the page scrolls past the threshold;
//! - theme: the cluster sits on top of page content, so when its anchor
//!   point drifts into a highlight section (the saturated "blue" bands),
//!   the buttons swap to the inverted scheme to stay legible.
//!
//! Membership is recomputed from fresh rects on every event, since sections
//! move with the page while the anchor does not.

use rustc_hash::FxHashSet;
use sightline_core::{SharedReactiveGraph, State};
use sightline_viewport::derive::{
    anchor_point, past_threshold, point_in_any, DEFAULT_ANCHOR_INSET_PX, DEFAULT_THRESHOLD_PX,
};
use sightline_viewport::{ScrollMetrics, SharedHost};
use std::sync::{Arc, Mutex};

/// Color scheme of the cluster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClusterTheme {
    /// Over ordinary content
    #[default]
    Default,
    /// Over a highlight section
    Inverted,
}

/// Driver for the floating contact cluster
#[derive(Clone)]
pub struct FloatingCluster {
    host: SharedHost,
    threshold_px: f32,
    anchor_inset_px: f32,
    sections: Arc<Mutex<FxHashSet<String>>>,
    visible: State<bool>,
    theme: State<ClusterTheme>,
}

impl FloatingCluster {
    pub fn new(graph: &SharedReactiveGraph, host: SharedHost) -> Self {
        Self::with_settings(graph, host, DEFAULT_THRESHOLD_PX, DEFAULT_ANCHOR_INSET_PX)
    }

    pub fn with_settings(
        graph: &SharedReactiveGraph,
        host: SharedHost,
        threshold_px: f32,
        anchor_inset_px: f32,
    ) -> Self {
        Self {
            host,
            threshold_px,
            anchor_inset_px,
            sections: Arc::new(Mutex::new(FxHashSet::default())),
            visible: State::new(graph, false),
            theme: State::new(graph, ClusterTheme::Default),
        }
    }

    /// Register a highlight section by element key
    pub fn add_section(&self, key: impl Into<String>) {
        self.sections.lock().unwrap().insert(key.into());
    }

    /// Remove a highlight section (it left the page)
    pub fn remove_section(&self, key: &str) {
        self.sections.lock().unwrap().remove(key);
    }

    /// Recompute visibility and theme from a fresh sample
    pub fn on_metrics(&self, metrics: &ScrollMetrics) {
        let visible = past_threshold(metrics, self.threshold_px);
        let anchor = anchor_point(metrics, self.anchor_inset_px);

        // Sections that have not rendered yet simply contribute nothing
        let rects: Vec<_> = {
            let sections = self.sections.lock().unwrap();
            sections
                .iter()
                .filter_map(|key| self.host.element_rect(key))
                .collect()
        };
        let theme = if point_in_any(anchor, rects.iter()) {
            ClusterTheme::Inverted
        } else {
            ClusterTheme::Default
        };

        let visible_signal = self.visible.signal();
        let theme_signal = self.theme.signal();
        self.visible.graph_handle().lock().unwrap().batch(|g| {
            g.set(visible_signal, visible);
            g.set(theme_signal, theme);
        });
    }

    pub fn visible(&self) -> &State<bool> {
        &self.visible
    }

    pub fn theme(&self) -> &State<ClusterTheme> {
        &self.theme
    }
}
