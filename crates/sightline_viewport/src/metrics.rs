//! Scroll metrics and the host seam
//!
//! [`ScrollMetrics`] is the raw material every signal is derived from. It is
//! sampled fresh on every event and never persisted: a snapshot is only
//! meaningful at the instant it was taken, because element rects move with
//! every scroll.
//!
//! [`ViewportHost`] is the seam standing in for the actual viewport and
//! document: a windowing shell, an embedded webview bridge, or a test
//! fixture. Hosts are expected to answer `element_rect` from already-known
//! layout (one rect read per element per call); anything more expensive
//! belongs behind the host's own cache.

use sightline_core::Rect;
use std::sync::Arc;

/// A snapshot of the scrollable document's position
///
/// `document_height` is the maximum scrollable distance, so
/// `scroll_top / document_height` spans [0, 1] across a full page scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Pixels scrolled from the top
    pub scroll_top: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Maximum scrollable distance; zero while content has not laid out
    pub document_height: f32,
}

impl ScrollMetrics {
    pub fn new(
        scroll_top: f32,
        viewport_width: f32,
        viewport_height: f32,
        document_height: f32,
    ) -> Self {
        Self {
            scroll_top,
            viewport_width,
            viewport_height,
            document_height,
        }
    }

    /// The viewport as a rect in viewport coordinates (origin at top-left)
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_width, self.viewport_height)
    }
}

/// The read side of the viewport/document
///
/// All reads are against *current* state; implementations must not return
/// stale rects. A missing element yields `None`, which every consumer treats
/// as "leave prior derived state unchanged", never as an error.
pub trait ViewportHost: Send + Sync {
    /// Current scroll metrics
    fn metrics(&self) -> ScrollMetrics;

    /// Current bounding rect of an element, in viewport coordinates
    ///
    /// `None` when the element is not (yet) present: before hydration, or
    /// while gated content has not rendered.
    fn element_rect(&self, key: &str) -> Option<Rect>;
}

/// Shared host handle passed to hubs, observers, and bindings
pub type SharedHost = Arc<dyn ViewportHost>;

/// An element-relative sample: the metrics and the element's rect at the
/// same instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementSample {
    pub metrics: ScrollMetrics,
    pub rect: Rect,
}

/// Sample an element together with the current metrics
///
/// Returns `None` (a no-op for the caller) when the element is missing.
pub fn sample_element(host: &dyn ViewportHost, key: &str) -> Option<ElementSample> {
    let rect = host.element_rect(key)?;
    Some(ElementSample {
        metrics: host.metrics(),
        rect,
    })
}
