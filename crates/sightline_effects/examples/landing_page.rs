//! Scripted landing-page scroll simulation
//!
//! Drives every effect driver from a fake page host, logging what a real
//! frontend would render at each scroll stop:
//!
//! ```sh
//! RUST_LOG=info cargo run -p sightline_effects --example landing_page
//! ```

use anyhow::Result;
use sightline_animation::AnimationScheduler;
use sightline_core::{LoadGate, ReactiveGraph, Rect, SharedReactiveGraph};
use sightline_effects::{
    FloatingCluster, FooterReveal, HeadingReveal, NavbarVisibility, Odometer, PinnedPanel,
    ProgressRing, RevealConfig,
};
use sightline_viewport::{
    Binding, IntersectionObserver, ScrollHub, ScrollMetrics, ViewportConfig, ViewportHost,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Fake document: a 6000px landing page inside a 1280x720 viewport
struct DemoPage {
    metrics: Mutex<ScrollMetrics>,
    rects: Mutex<HashMap<String, Rect>>,
}

impl DemoPage {
    fn shared() -> Arc<Self> {
        Arc::new(Self {
            metrics: Mutex::new(ScrollMetrics::new(0.0, 1280.0, 720.0, 6000.0)),
            rects: Mutex::new(HashMap::new()),
        })
    }

    /// Scroll and reposition the sections the way a browser would
    fn scroll_to(&self, top: f32) {
        self.metrics.lock().unwrap().scroll_top = top;
        let mut rects = self.rects.lock().unwrap();
        // Static document positions; on-screen y = doc_y - scroll_top
        for (key, doc_y, h) in [
            ("hero", 0.0, 720.0),
            ("stats", 1400.0, 300.0),
            ("alumni-heading", 2300.0, 120.0),
            ("admissions-band", 3200.0, 500.0),
        ] {
            rects.insert(key.to_owned(), Rect::new(0.0, doc_y - top, 1280.0, h));
        }
    }
}

impl ViewportHost for DemoPage {
    fn metrics(&self) -> ScrollMetrics {
        *self.metrics.lock().unwrap()
    }

    fn element_rect(&self, key: &str) -> Option<Rect> {
        self.rects.lock().unwrap().get(key).copied()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ViewportConfig::default();
    let page = DemoPage::shared();
    page.scroll_to(0.0);

    let hub = ScrollHub::new(page.clone());
    hub.set_throttle(config.throttle());
    let observer = IntersectionObserver::new(page.clone());
    let _conn = observer.connect(&hub);

    let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
    let scheduler = AnimationScheduler::new();

    // Content "loads" before effects arm
    let gate = LoadGate::new();
    gate.set_ready(true);

    // Back-to-top ring
    let ring = ProgressRing::new(&graph);
    let ring_clone = ring.clone();
    let mut ring_binding = Binding::new(hub.clone(), move |m, _| ring_clone.on_metrics(m))
        .with_gate(gate.clone());
    ring_binding.poll_attach();

    // Floating contact cluster
    let cluster = FloatingCluster::new(&graph, page.clone());
    cluster.add_section("admissions-band");
    let cluster_clone = cluster.clone();
    let mut cluster_binding = Binding::new(hub.clone(), move |m, _| cluster_clone.on_metrics(m))
        .with_gate(gate.clone());
    cluster_binding.poll_attach();

    // Navbar driven by hero occlusion
    let navbar = NavbarVisibility::new(&graph);
    let _nav_reg = observer.observe("hero", navbar.ratio_callback());

    // Stats odometer
    let odometer = Odometer::new(scheduler.handle(), 1200, 4, config.odometer.clone());
    let _odo_reg = observer.observe("stats", odometer.visibility_callback());

    // Heading reveal waits for the gate
    let reveal = HeadingReveal::mount(
        &gate,
        scheduler.handle(),
        "Placements That Speak For Themselves",
        RevealConfig::default(),
    )
    .await;
    let _reveal_reg = observer.observe("alumni-heading", reveal.visibility_callback());

    // Pinned journey panel between 4000 and 5200
    let panel = PinnedPanel::new(&graph, 4000.0, 5200.0, 3840.0);
    let panel_clone = panel.clone();
    let mut panel_binding = Binding::new(hub.clone(), move |m, _| panel_clone.on_metrics(m));
    panel_binding.poll_attach();

    // Footer slides in over the last stretch of the page
    let footer = FooterReveal::new(scheduler.handle(), 240.0);
    let footer_clone = footer.clone();
    let mut footer_binding = Binding::new(hub.clone(), move |m, _| footer_clone.on_metrics(m));
    footer_binding.poll_attach();

    // Scripted scroll session
    for top in [0.0, 300.0, 700.0, 1500.0, 2400.0, 3400.0, 4600.0, 5800.0] {
        page.scroll_to(top);
        hub.publish();

        // Let staggered animations advance a little between stops
        std::thread::sleep(Duration::from_millis(120));
        scheduler.tick();

        tracing::info!(
            scroll_top = top,
            navbar = navbar.visible().get(),
            back_to_top = ring.visible().get(),
            ring_dashoffset = format!("{:.1}", ring.dashoffset().get()),
            cluster_theme = ?cluster.theme().get(),
            odometer = ?odometer
                .offsets()
                .iter()
                .map(|o| format!("{o:.0}"))
                .collect::<Vec<_>>(),
            heading = ?reveal
                .unit_opacities()
                .iter()
                .map(|o| format!("{o:.2}"))
                .collect::<Vec<_>>(),
            panel_offset_x = format!("{:.0}", panel.offset_x().get()),
            footer_offset_y = format!("{:.0}", footer.offset_y()),
            "frame"
        );
    }

    // Let the stagger tails finish
    while scheduler.has_active_animations() {
        std::thread::sleep(Duration::from_millis(16));
        scheduler.tick();
    }
    tracing::info!(
        odometer = ?odometer.offsets(),
        heading_played = reveal.has_played(),
        "settled"
    );

    ring_binding.detach();
    cluster_binding.detach();
    panel_binding.detach();
    footer_binding.detach();
    assert_eq!(hub.subscriber_count(), 1); // Only the observer connection remains

    Ok(())
}
