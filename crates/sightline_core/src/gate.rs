//! Content-readiness gate
//!
//! Scroll-linked effects must not animate against empty or placeholder
//! content, so every binding is gated on "has the content loaded yet".
//! [`LoadGate`] is that flag as an explicit, injected dependency: the data
//! layer holds the write side, bindings hold the read side. No ambient
//! global.
//!
//! Two consumption styles are supported:
//!
//! - synchronous subscription (`subscribe`) for bindings that attach/detach
//!   as readiness flips;
//! - an async one-shot continuation (`wait_ready`) for setup that should run
//!   exactly once when content (or fonts) arrive, e.g. the heading reveal.
//!
//! A fetch failure never flips the gate; it is recorded and logged, and the
//! mechanism simply stays dormant.

use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;

type ReadyCallback = Arc<dyn Fn(bool) + Send + Sync>;

struct GateInner {
    ready: bool,
    last_failure: Option<String>,
    subscribers: Vec<(u64, ReadyCallback)>,
    next_id: u64,
}

/// Shared readiness flag with change notification
#[derive(Clone)]
pub struct LoadGate {
    inner: Arc<Mutex<GateInner>>,
    tx: Arc<watch::Sender<bool>>,
}

impl LoadGate {
    /// Create a gate that starts closed (content not loaded)
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            inner: Arc::new(Mutex::new(GateInner {
                ready: false,
                last_failure: None,
                subscribers: Vec::new(),
                next_id: 0,
            })),
            tx: Arc::new(tx),
        }
    }

    /// Create a gate that is already open (static content)
    pub fn ready() -> Self {
        let gate = Self::new();
        gate.set_ready(true);
        gate
    }

    pub fn is_ready(&self) -> bool {
        self.inner.lock().unwrap().ready
    }

    /// Flip the gate; subscribers are notified only on actual transitions
    pub fn set_ready(&self, ready: bool) {
        // Snapshot callbacks, then invoke outside the lock so a subscriber
        // may re-subscribe or unsubscribe from within its callback.
        let callbacks: Vec<ReadyCallback> = {
            let mut inner = self.inner.lock().unwrap();
            if inner.ready == ready {
                return;
            }
            inner.ready = ready;
            inner.subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        tracing::debug!(ready, subscribers = callbacks.len(), "load gate changed");
        let _ = self.tx.send(ready);
        for cb in callbacks {
            cb(ready);
        }
    }

    /// Record a content-fetch failure without opening the gate
    pub fn fail(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "content fetch failed; gate stays closed");
        self.inner.lock().unwrap().last_failure = Some(reason);
    }

    /// The most recent failure reason, if any
    pub fn last_failure(&self) -> Option<String> {
        self.inner.lock().unwrap().last_failure.clone()
    }

    /// Subscribe to readiness transitions
    ///
    /// The callback fires on every transition (not on subscribe). The
    /// returned handle unsubscribes when dropped.
    pub fn subscribe<F>(&self, callback: F) -> GateSubscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        GateSubscription {
            gate: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Number of live subscriptions (diagnostics/tests)
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().unwrap().subscribers.len()
    }

    /// Resolve once the gate opens; returns immediately if already open
    ///
    /// The one-shot continuation used for deferred setup ("start the text
    /// reveal once fonts are in"). Resumes the caller on the task it was
    /// awaited from; the synchronous setup it continues runs there.
    pub async fn wait_ready(&self) {
        let mut rx = self.tx.subscribe();
        // Check current state first: subscribe() only sees future sends
        if self.is_ready() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
    }
}

impl Default for LoadGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription handle; unsubscribes on drop
pub struct GateSubscription {
    gate: Weak<Mutex<GateInner>>,
    id: u64,
}

impl GateSubscription {
    /// Remove the subscription explicitly
    pub fn unsubscribe(self) {
        // Drop does the work
    }
}

impl Drop for GateSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.gate.upgrade() {
            inner
                .lock()
                .unwrap()
                .subscribers
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_starts_closed() {
        let gate = LoadGate::new();
        assert!(!gate.is_ready());
        assert!(LoadGate::ready().is_ready());
    }

    #[test]
    fn test_notifies_on_transition_only() {
        let gate = LoadGate::new();
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        let _sub = gate.subscribe(move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        gate.set_ready(false); // No transition
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        gate.set_ready(true);
        gate.set_ready(true); // No transition
        gate.set_ready(false);
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unsubscribe_on_drop() {
        let gate = LoadGate::new();
        {
            let _sub = gate.subscribe(|_| {});
            assert_eq!(gate.subscriber_count(), 1);
        }
        assert_eq!(gate.subscriber_count(), 0);
    }

    #[test]
    fn test_failure_keeps_gate_closed() {
        let gate = LoadGate::new();
        gate.fail("GET /testimonials returned 503");
        assert!(!gate.is_ready());
        assert_eq!(
            gate.last_failure().as_deref(),
            Some("GET /testimonials returned 503")
        );
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_immediately_when_open() {
        let gate = LoadGate::ready();
        gate.wait_ready().await;
    }

    #[tokio::test]
    async fn test_wait_ready_resolves_on_open() {
        let gate = LoadGate::new();
        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                gate.wait_ready().await;
                true
            })
        };
        tokio::task::yield_now().await;
        gate.set_ready(true);
        assert!(waiter.await.unwrap());
    }
}
