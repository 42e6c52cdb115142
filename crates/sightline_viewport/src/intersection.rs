//! Intersection observation
//!
//! The platform-independent stand-in for the browser's intersection
//! primitive: targets register by element key, and on every metrics update
//! the observer recomputes each target's visible fraction and reports it
//! when it changed (or crossed a registered threshold). Targets are
//! reported in registration order.
//!
//! A target whose element is missing is skipped: its last known ratio is
//! left unchanged and observation resumes when the element appears.

use crate::derive::intersection_ratio;
use crate::hub::{HubSubscription, ScrollHub};
use crate::metrics::{ScrollMetrics, SharedHost};
use indexmap::IndexMap;
use std::sync::{Arc, Mutex, Weak};

/// Ratio changes smaller than this are noise, not reports
const RATIO_EPSILON: f32 = 1e-6;

type RatioCallback = Arc<dyn Fn(f32) + Send + Sync>;

struct TargetEntry {
    key: String,
    thresholds: Vec<f32>,
    callback: RatioCallback,
    last_ratio: Option<f32>,
}

struct ObserverInner {
    /// IndexMap keeps report order equal to registration order
    targets: IndexMap<u64, TargetEntry>,
    next_id: u64,
}

/// Recomputes visible fractions for registered targets on each update
#[derive(Clone)]
pub struct IntersectionObserver {
    host: SharedHost,
    inner: Arc<Mutex<ObserverInner>>,
}

impl IntersectionObserver {
    pub fn new(host: SharedHost) -> Self {
        Self {
            host,
            inner: Arc::new(Mutex::new(ObserverInner {
                targets: IndexMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Observe an element; the callback receives its visible fraction
    ///
    /// The first update after registration always reports, so consumers see
    /// the initial state without a synthetic event.
    pub fn observe<F>(&self, key: impl Into<String>, callback: F) -> ObserverRegistration
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.observe_with_thresholds(key, Vec::new(), callback)
    }

    /// Observe with explicit thresholds: a report is also forced whenever
    /// the ratio crosses one, however small the change
    pub fn observe_with_thresholds<F>(
        &self,
        key: impl Into<String>,
        thresholds: Vec<f32>,
        callback: F,
    ) -> ObserverRegistration
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.targets.insert(
            id,
            TargetEntry {
                key: key.into(),
                thresholds,
                callback: Arc::new(callback),
                last_ratio: None,
            },
        );
        ObserverRegistration {
            observer: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn target_count(&self) -> usize {
        self.inner.lock().unwrap().targets.len()
    }

    /// Recompute every target against the given metrics
    pub fn on_metrics(&self, metrics: &ScrollMetrics) {
        // Compute and record inside the lock, invoke outside it.
        let reports: Vec<(RatioCallback, f32)> = {
            let mut inner = self.inner.lock().unwrap();
            let mut reports = Vec::new();
            for (_, target) in inner.targets.iter_mut() {
                // Missing element: leave prior state untouched
                let Some(rect) = self.host.element_rect(&target.key) else {
                    continue;
                };
                let ratio = intersection_ratio(&rect, metrics);
                if should_report(target.last_ratio, ratio, &target.thresholds) {
                    target.last_ratio = Some(ratio);
                    reports.push((Arc::clone(&target.callback), ratio));
                }
            }
            reports
        };
        for (cb, ratio) in reports {
            cb(ratio);
        }
    }

    /// Drive this observer from a hub
    ///
    /// Keep the returned subscription alive for as long as observation
    /// should continue.
    pub fn connect(&self, hub: &ScrollHub) -> HubSubscription {
        let observer = self.clone();
        hub.subscribe(move |metrics| observer.on_metrics(metrics))
    }
}

fn should_report(last: Option<f32>, ratio: f32, thresholds: &[f32]) -> bool {
    match last {
        None => true,
        Some(last) => {
            (ratio - last).abs() > RATIO_EPSILON
                || thresholds.iter().any(|&t| (last < t) != (ratio < t))
        }
    }
}

/// RAII observer registration; unregisters on drop
pub struct ObserverRegistration {
    observer: Weak<Mutex<ObserverInner>>,
    id: u64,
}

impl ObserverRegistration {
    pub fn unobserve(self) {
        // Drop does the work
    }
}

impl Drop for ObserverRegistration {
    fn drop(&mut self) {
        if let Some(inner) = self.observer.upgrade() {
            inner.lock().unwrap().targets.shift_remove(&self.id);
        }
    }
}
