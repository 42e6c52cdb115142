//! Effect bindings and the lifecycle guard
//!
//! A [`Binding`] ties one derivation + effect pair to the hub for the
//! duration of a mount. It owns its subscription exclusively and enforces
//! the lifecycle contract:
//!
//! - attach only when the readiness gate is open and the target element
//!   exists, sampling once immediately so the first paint is correct;
//! - never hold two subscriptions at once: a dependency change (gate
//!   closing, target swap) tears the old subscription down before a new
//!   cycle begins;
//! - detach exactly once, and always, via [`Binding::detach`] or `Drop`.
//!
//! Attachment is poll-driven: hosts call [`Binding::poll_attach`] on every
//! relevant re-render, which is also how a binding waits out a target
//! element that has not rendered yet.

use crate::hub::{HubSubscription, ScrollHub};
use crate::metrics::ScrollMetrics;
use sightline_core::fsm::{events, StateTransitions};
use sightline_core::{BindingState, LoadGate, Rect};
use std::sync::{Arc, Mutex};

/// Sample delivery: metrics plus the target's rect (when a target is set)
pub type SampleCallback = Arc<dyn Fn(&ScrollMetrics, Option<Rect>) + Send + Sync>;

/// One component's scroll subscription, with lifecycle enforcement
pub struct Binding {
    hub: ScrollHub,
    gate: Option<LoadGate>,
    target: Option<String>,
    on_sample: SampleCallback,
    state: Arc<Mutex<BindingState>>,
    subscription: Option<HubSubscription>,
}

impl Binding {
    /// Create an unattached binding; call [`Binding::poll_attach`] to arm it
    pub fn new<F>(hub: ScrollHub, on_sample: F) -> Self
    where
        F: Fn(&ScrollMetrics, Option<Rect>) + Send + Sync + 'static,
    {
        Self {
            hub,
            gate: None,
            target: None,
            on_sample: Arc::new(on_sample),
            state: Arc::new(Mutex::new(BindingState::default())),
            subscription: None,
        }
    }

    /// Require an element to exist before attaching; its rect is delivered
    /// with every sample
    pub fn with_target(mut self, key: impl Into<String>) -> Self {
        self.target = Some(key.into());
        self
    }

    /// Defer attachment until the content-readiness gate opens
    pub fn with_gate(mut self, gate: LoadGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn state(&self) -> BindingState {
        *self.state.lock().unwrap()
    }

    /// Try to reach (or keep) the attached state; returns the state after
    /// the attempt
    ///
    /// Call on mount and on every re-render that might change a dependency:
    /// the readiness gate flipping, or the target element appearing.
    pub fn poll_attach(&mut self) -> BindingState {
        if self.state().is_detached() {
            return BindingState::Detached;
        }

        let ready = self.gate.as_ref().map(|g| g.is_ready()).unwrap_or(true);

        if self.state().is_attached() {
            if !ready {
                // Readiness lost: this mount cycle is over; the next open
                // gate starts a fresh one.
                self.suspend();
            }
            return self.state();
        }

        if !ready {
            return BindingState::Uninitialized;
        }

        // A binding with a target defers until the element renders
        let initial_rect = match &self.target {
            Some(key) => match self.hub.host().element_rect(key) {
                Some(rect) => Some(rect),
                None => return BindingState::Uninitialized,
            },
            None => None,
        };

        self.subscription = Some(self.make_subscription());
        self.state.lock().unwrap().apply(events::ATTACH);

        // Immediate initial sample: no blank or stale first paint
        (self.on_sample)(&self.hub.sample(), initial_rect);

        self.state()
    }

    /// Swap the target element; the old subscription is removed before the
    /// next cycle can attach to the new target
    pub fn retarget(&mut self, key: impl Into<String>) {
        if self.state().is_detached() {
            return;
        }
        self.suspend();
        self.target = Some(key.into());
    }

    /// Tear down permanently; terminal for this mount
    pub fn detach(&mut self) {
        self.subscription = None;
        self.state.lock().unwrap().apply(events::DETACH);
    }

    /// End the current cycle without ending the mount
    fn suspend(&mut self) {
        self.subscription = None;
        *self.state.lock().unwrap() = BindingState::default();
    }

    fn make_subscription(&self) -> HubSubscription {
        let state = Arc::clone(&self.state);
        let on_sample = Arc::clone(&self.on_sample);
        let target = self.target.clone();
        let host = Arc::clone(self.hub.host());

        self.hub.subscribe(move |metrics| {
            let rect = match &target {
                Some(key) => match host.element_rect(key) {
                    Some(rect) => Some(rect),
                    // Target vanished mid-flight: leave prior derived
                    // state unchanged
                    None => return,
                },
                None => None,
            };
            {
                let mut state = state.lock().unwrap();
                if !state.is_attached() {
                    return;
                }
                state.apply(events::SAMPLE);
            }
            on_sample(metrics, rect);
        })
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ViewportHost;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct PageHost {
        metrics: Mutex<ScrollMetrics>,
        rects: Mutex<HashMap<String, Rect>>,
    }

    impl PageHost {
        fn shared() -> Arc<Self> {
            Arc::new(Self {
                metrics: Mutex::new(ScrollMetrics::new(0.0, 1280.0, 720.0, 2000.0)),
                rects: Mutex::new(HashMap::new()),
            })
        }

        fn scroll_to(&self, top: f32) {
            self.metrics.lock().unwrap().scroll_top = top;
        }

        fn place(&self, key: &str, rect: Rect) {
            self.rects.lock().unwrap().insert(key.into(), rect);
        }
    }

    impl ViewportHost for PageHost {
        fn metrics(&self) -> ScrollMetrics {
            *self.metrics.lock().unwrap()
        }

        fn element_rect(&self, key: &str) -> Option<Rect> {
            self.rects.lock().unwrap().get(key).copied()
        }
    }

    #[test]
    fn test_attach_samples_immediately() {
        let host = PageHost::shared();
        host.scroll_to(640.0);
        let hub = ScrollHub::new(host);

        let samples = Arc::new(Mutex::new(Vec::new()));
        let samples_clone = Arc::clone(&samples);
        let mut binding = Binding::new(hub, move |m, _| {
            samples_clone.lock().unwrap().push(m.scroll_top);
        });

        assert_eq!(binding.poll_attach(), BindingState::Attached);
        assert_eq!(*samples.lock().unwrap(), vec![640.0]);
    }

    #[test]
    fn test_no_leaked_subscription_after_detach() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host);
        let before = hub.subscriber_count();

        let mut binding = Binding::new(hub.clone(), |_, _| {});
        binding.poll_attach();
        assert_eq!(hub.subscriber_count(), before + 1);

        binding.detach();
        assert_eq!(hub.subscriber_count(), before);
        assert!(binding.state().is_detached());

        // Terminal: re-polling never re-attaches
        assert_eq!(binding.poll_attach(), BindingState::Detached);
        assert_eq!(hub.subscriber_count(), before);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host);
        let before = hub.subscriber_count();
        {
            let mut binding = Binding::new(hub.clone(), |_, _| {});
            binding.poll_attach();
            assert_eq!(hub.subscriber_count(), before + 1);
        }
        assert_eq!(hub.subscriber_count(), before);
    }

    #[test]
    fn test_repeated_polls_do_not_stack_subscriptions() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host);

        let mut binding = Binding::new(hub.clone(), |_, _| {});
        for _ in 0..5 {
            binding.poll_attach();
        }
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn test_gate_defers_then_attaches() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host);
        let gate = LoadGate::new();

        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = Arc::clone(&fired);
        let mut binding = Binding::new(hub.clone(), move |_, _| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        })
        .with_gate(gate.clone());

        assert_eq!(binding.poll_attach(), BindingState::Uninitialized);
        hub.publish();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        gate.set_ready(true);
        assert_eq!(binding.poll_attach(), BindingState::Attached);
        assert_eq!(fired.load(Ordering::SeqCst), 1); // Initial sample

        hub.publish();
        assert_eq!(fired.load(Ordering::SeqCst), 2);
        assert_eq!(binding.state(), BindingState::Updated);
    }

    #[test]
    fn test_gate_closing_suspends_cycle() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host);
        let gate = LoadGate::ready();

        let mut binding = Binding::new(hub.clone(), |_, _| {}).with_gate(gate.clone());
        binding.poll_attach();
        assert!(binding.state().is_attached());

        gate.set_ready(false);
        assert_eq!(binding.poll_attach(), BindingState::Uninitialized);
        assert_eq!(hub.subscriber_count(), 0);

        // Gate reopens: a fresh cycle attaches
        gate.set_ready(true);
        assert_eq!(binding.poll_attach(), BindingState::Attached);
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn test_target_defers_until_rendered() {
        let host = PageHost::shared();
        let hub = ScrollHub::new(host.clone());

        let rects = Arc::new(Mutex::new(Vec::new()));
        let rects_clone = Arc::clone(&rects);
        let mut binding = Binding::new(hub, move |_, rect| {
            rects_clone.lock().unwrap().push(rect);
        })
        .with_target("stats");

        assert_eq!(binding.poll_attach(), BindingState::Uninitialized);
        assert!(rects.lock().unwrap().is_empty());

        host.place("stats", Rect::new(0.0, 900.0, 1280.0, 300.0));
        assert_eq!(binding.poll_attach(), BindingState::Attached);
        assert_eq!(
            *rects.lock().unwrap(),
            vec![Some(Rect::new(0.0, 900.0, 1280.0, 300.0))]
        );
    }

    #[test]
    fn test_retarget_detaches_before_reattaching() {
        let host = PageHost::shared();
        host.place("a", Rect::new(0.0, 0.0, 10.0, 10.0));
        host.place("b", Rect::new(0.0, 500.0, 10.0, 10.0));
        let hub = ScrollHub::new(host);

        let mut binding = Binding::new(hub.clone(), |_, _| {}).with_target("a");
        binding.poll_attach();
        assert_eq!(hub.subscriber_count(), 1);

        binding.retarget("b");
        // Old subscription is gone before the new cycle attaches
        assert_eq!(hub.subscriber_count(), 0);
        assert_eq!(binding.poll_attach(), BindingState::Attached);
        assert_eq!(hub.subscriber_count(), 1);
    }
}
