//! The shared scroll hub
//!
//! One scroll-position observable per page. The host forwards every
//! scroll/resize event to [`ScrollHub::publish`]; the hub samples metrics
//! once and fans them out, so N bindings cost one layout read per event
//! instead of N.
//!
//! Subscribers are invoked in registration order, and a subscriber is
//! removed by dropping its [`HubSubscription`]: the unsubscribe half of the
//! lifecycle contract is enforced by RAII, not by convention.
//!
//! Throttling is available but off by default: the original recomputed on
//! every tick, and matching that observable timing is the safer default. A
//! throttled hub stashes the newest metrics and delivers them on the next
//! eligible publish or an explicit [`ScrollHub::flush`] (scroll-end), so the
//! final scroll position is never dropped.

use crate::metrics::{ScrollMetrics, SharedHost};
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

new_key_type! {
    /// Identifier of a hub subscription
    pub struct SubscriptionId;
}

type MetricsCallback = Arc<dyn Fn(&ScrollMetrics) + Send + Sync>;

struct HubInner {
    subscribers: SlotMap<SubscriptionId, MetricsCallback>,
    /// Delivery order; slotmap iteration order is not registration order
    order: Vec<SubscriptionId>,
    min_interval: Option<Duration>,
    last_delivery: Option<Instant>,
    /// Newest undelivered metrics while throttled
    pending: Option<ScrollMetrics>,
}

/// The shared, optionally throttled scroll-position observable
#[derive(Clone)]
pub struct ScrollHub {
    host: SharedHost,
    inner: Arc<Mutex<HubInner>>,
}

impl ScrollHub {
    pub fn new(host: SharedHost) -> Self {
        Self {
            host,
            inner: Arc::new(Mutex::new(HubInner {
                subscribers: SlotMap::with_key(),
                order: Vec::new(),
                min_interval: None,
                last_delivery: None,
                pending: None,
            })),
        }
    }

    /// The host this hub samples from
    pub fn host(&self) -> &SharedHost {
        &self.host
    }

    /// Enable or disable throttling
    pub fn set_throttle(&self, min_interval: Option<Duration>) {
        self.inner.lock().unwrap().min_interval = min_interval;
    }

    /// Subscribe to published metrics
    ///
    /// The callback fires on future publishes only; bindings that need an
    /// immediate first sample read [`ScrollHub::sample`] themselves on
    /// attach. Dropping the returned handle unsubscribes.
    pub fn subscribe<F>(&self, callback: F) -> HubSubscription
    where
        F: Fn(&ScrollMetrics) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.subscribers.insert(Arc::new(callback));
        inner.order.push(id);
        HubSubscription {
            hub: Arc::downgrade(&self.inner),
            id,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Sample current metrics directly from the host
    pub fn sample(&self) -> ScrollMetrics {
        self.host.metrics()
    }

    /// Handle a scroll/resize event: sample once and fan out
    pub fn publish(&self) {
        let metrics = self.host.metrics();

        let deliver = {
            let mut inner = self.inner.lock().unwrap();
            match inner.min_interval {
                None => true,
                Some(interval) => {
                    let due = inner
                        .last_delivery
                        .map(|last| last.elapsed() >= interval)
                        .unwrap_or(true);
                    if !due {
                        inner.pending = Some(metrics);
                    }
                    due
                }
            }
        };

        if deliver {
            self.deliver(metrics);
        }
    }

    /// Deliver any metrics held back by the throttle (trailing edge)
    ///
    /// Hosts call this on scroll-end so the last position always lands.
    pub fn flush(&self) {
        let pending = self.inner.lock().unwrap().pending.take();
        if let Some(metrics) = pending {
            self.deliver(metrics);
        }
    }

    fn deliver(&self, metrics: ScrollMetrics) {
        // Snapshot callbacks in registration order, then invoke outside the
        // lock so a callback may subscribe/unsubscribe without deadlocking.
        let callbacks: Vec<MetricsCallback> = {
            let mut inner = self.inner.lock().unwrap();
            inner.last_delivery = Some(Instant::now());
            inner.pending = None;
            inner
                .order
                .iter()
                .filter_map(|id| inner.subscribers.get(*id).map(Arc::clone))
                .collect()
        };
        tracing::trace!(
            scroll_top = metrics.scroll_top,
            subscribers = callbacks.len(),
            "hub delivery"
        );
        for cb in callbacks {
            cb(&metrics);
        }
    }
}

/// RAII hub subscription; unsubscribes on drop
pub struct HubSubscription {
    hub: Weak<Mutex<HubInner>>,
    id: SubscriptionId,
}

impl HubSubscription {
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for HubSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.hub.upgrade() {
            let mut inner = inner.lock().unwrap();
            inner.subscribers.remove(self.id);
            inner.order.retain(|id| *id != self.id);
        }
    }
}
