//! End-to-end behavior of a composed landing page
//!
//! A scripted page host stands in for the real viewport; effects are wired
//! the way a host application wires them (hub + bindings + observer) and
//! driven by publishing scroll events.

use sightline_core::{LoadGate, ReactiveGraph, Rect, SharedReactiveGraph};
use sightline_effects::{ClusterTheme, FloatingCluster, Odometer, ProgressRing};
use sightline_viewport::{
    Binding, IntersectionObserver, OdometerConfig, ScrollHub, ScrollMetrics, ViewportHost,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct FakePage {
    metrics: Mutex<ScrollMetrics>,
    rects: Mutex<HashMap<String, Rect>>,
}

impl FakePage {
    fn shared(viewport: (f32, f32), document_height: f32) -> Arc<Self> {
        Arc::new(Self {
            metrics: Mutex::new(ScrollMetrics::new(0.0, viewport.0, viewport.1, document_height)),
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

impl ViewportHost for FakePage {
    fn metrics(&self) -> ScrollMetrics {
        *self.metrics.lock().unwrap()
    }

    fn element_rect(&self, key: &str) -> Option<Rect> {
        self.rects.lock().unwrap().get(key).copied()
    }
}

fn graph() -> SharedReactiveGraph {
    Arc::new(Mutex::new(ReactiveGraph::new()))
}

#[test]
fn progress_ring_tracks_scroll_one_to_one() {
    let page = FakePage::shared((1280.0, 720.0), 2000.0);
    let hub = ScrollHub::new(page.clone());

    let ring = ProgressRing::new(&graph());
    let ring_clone = ring.clone();
    let mut binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m));
    binding.poll_attach();

    // Halfway down a 2000px document
    page.scroll_to(1000.0);
    hub.publish();

    let expected = 0.5 * std::f32::consts::TAU * 24.0;
    assert!((ring.dashoffset().get() - expected).abs() < 1e-3);
    assert!((expected - 75.4).abs() < 0.01);
    assert!(ring.visible().get());
}

#[test]
fn threshold_boundary_is_strict() {
    let page = FakePage::shared((1280.0, 720.0), 4000.0);
    let hub = ScrollHub::new(page.clone());

    let ring = ProgressRing::new(&graph());
    let ring_clone = ring.clone();
    let mut binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m));
    binding.poll_attach();

    page.scroll_to(500.0);
    hub.publish();
    assert!(!ring.visible().get());

    page.scroll_to(500.5);
    hub.publish();
    assert!(ring.visible().get());
}

#[test]
fn unloaded_page_never_divides_by_zero() {
    let page = FakePage::shared((1280.0, 720.0), 0.0);
    let hub = ScrollHub::new(page.clone());

    let ring = ProgressRing::new(&graph());
    let ring_clone = ring.clone();
    let mut binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m));
    binding.poll_attach();

    page.scroll_to(300.0);
    hub.publish();

    // Progress 0: the ring stays empty
    assert!((ring.dashoffset().get() - ring.circumference()).abs() < 1e-3);
}

#[test]
fn mount_unmount_leaves_no_listeners() {
    let page = FakePage::shared((1280.0, 720.0), 3000.0);
    let hub = ScrollHub::new(page.clone());
    let observer = IntersectionObserver::new(page.clone());
    let shared_graph = graph();

    let before_subs = hub.subscriber_count();
    let before_targets = observer.target_count();

    {
        let ring = ProgressRing::new(&shared_graph);
        let cluster = FloatingCluster::new(&shared_graph, page.clone());

        let ring_clone = ring.clone();
        let mut ring_binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m));
        ring_binding.poll_attach();

        let cluster_clone = cluster.clone();
        let mut cluster_binding =
            Binding::new(hub.clone(), move |m, _| cluster_clone.on_metrics(m));
        cluster_binding.poll_attach();

        let _conn = observer.connect(&hub);
        let odo = Odometer::new(
            sightline_animation::AnimationScheduler::new().handle(),
            1200,
            4,
            OdometerConfig::default(),
        );
        let _reg = observer.observe("stats", odo.visibility_callback());

        assert_eq!(hub.subscriber_count(), before_subs + 3);
        assert_eq!(observer.target_count(), before_targets + 1);
    }

    // Everything dropped: counts match the pre-mount state exactly
    assert_eq!(hub.subscriber_count(), before_subs);
    assert_eq!(observer.target_count(), before_targets);
}

#[test]
fn floating_cluster_theme_follows_sections() {
    let page = FakePage::shared((1280.0, 720.0), 5000.0);
    let hub = ScrollHub::new(page.clone());

    let cluster = FloatingCluster::new(&graph(), page.clone());
    cluster.add_section("admissions-band");

    let cluster_clone = cluster.clone();
    let mut binding = Binding::new(hub.clone(), move |m, _| cluster_clone.on_metrics(m));
    binding.poll_attach();

    // Anchor is at (1200, 640); the band covers the lower half of the screen
    page.scroll_to(900.0);
    page.place("admissions-band", Rect::new(0.0, 400.0, 1280.0, 500.0));
    hub.publish();
    assert_eq!(cluster.theme().get(), ClusterTheme::Inverted);
    assert!(cluster.visible().get());

    // Further scrolling moves the band off the anchor
    page.scroll_to(1600.0);
    page.place("admissions-band", Rect::new(0.0, -300.0, 1280.0, 500.0));
    hub.publish();
    assert_eq!(cluster.theme().get(), ClusterTheme::Default);
}

#[test]
fn odometer_plays_once_through_observer() {
    let page = FakePage::shared((1280.0, 720.0), 5000.0);
    let hub = ScrollHub::new(page.clone());
    let observer = IntersectionObserver::new(page.clone());
    let _conn = observer.connect(&hub);

    let scheduler = sightline_animation::AnimationScheduler::new();
    let config = OdometerConfig::default();
    let h = config.digit_height_px;
    let odo = Odometer::new(scheduler.handle(), 42, 3, config);
    let _reg = observer.observe("stats", odo.visibility_callback());

    // Stats section below the fold: 0% visible
    page.place("stats", Rect::new(0.0, 1000.0, 1280.0, 300.0));
    hub.publish();
    assert!(!odo.has_played());

    // Scrolled into view, 2/3 visible (>= 60%)
    page.place("stats", Rect::new(0.0, 520.0, 1280.0, 300.0));
    hub.publish();
    assert!(odo.has_played());
    assert_eq!(odo.targets(), vec![0.0, -4.0 * h, -2.0 * h]);
    let delays = odo.delays();
    assert!((delays[1] - 0.15).abs() < 1e-6 && (delays[2] - 0.30).abs() < 1e-6);

    // Fully visible, partially visible, gone: no re-trigger, no movement
    // without scheduler ticks
    scheduler.tick();
    let rolled = odo.offsets();
    for rect in [
        Rect::new(0.0, 200.0, 1280.0, 300.0),
        Rect::new(0.0, 650.0, 1280.0, 300.0),
        Rect::new(0.0, 2000.0, 1280.0, 300.0),
    ] {
        page.place("stats", rect);
        hub.publish();
    }
    assert_eq!(odo.offsets(), rolled);
}

#[test]
fn gated_binding_stays_dormant_on_fetch_failure() {
    let page = FakePage::shared((1280.0, 720.0), 2000.0);
    let hub = ScrollHub::new(page.clone());
    let gate = LoadGate::new();

    let ring = ProgressRing::new(&graph());
    let ring_clone = ring.clone();
    let mut binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m))
        .with_gate(gate.clone());

    binding.poll_attach();
    page.scroll_to(1200.0);
    hub.publish();

    // Content API failed: gate closed, ring untouched
    gate.fail("GET /banners: connection refused");
    binding.poll_attach();
    hub.publish();
    assert!(!ring.visible().get());
    assert_eq!(hub.subscriber_count(), 0);

    // A later retry succeeds; attach samples immediately
    gate.set_ready(true);
    binding.poll_attach();
    assert!(ring.visible().get());
}
