//! Navbar visibility
//!
//! The navbar overlays the hero banner and gets out of the way once the
//! hero dominates the screen: hidden when the hero's visible fraction
//! reaches 0.5, shown again when it drops back. The re-show ratio sits
//! slightly below the hide ratio so the bar does not flicker while the
//! boundary ratio jitters across event samples.

use sightline_core::fsm::StateTransitions;
use sightline_core::{SharedReactiveGraph, State};
use std::sync::{Arc, Mutex};

/// Hero visibility at which the navbar hides
pub const NAVBAR_HIDE_RATIO: f32 = 0.5;

/// Hero visibility at or below which the navbar re-shows
pub const NAVBAR_SHOW_RATIO: f32 = 0.45;

mod nav_events {
    /// Hero ratio reached the hide threshold
    pub const OCCLUDE: u32 = 40;
    /// Hero ratio fell back under the show threshold
    pub const CLEAR: u32 = 41;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
enum NavbarState {
    #[default]
    Shown,
    Hidden,
}

impl StateTransitions for NavbarState {
    fn on_event(&self, event: u32) -> Option<Self> {
        match (self, event) {
            (NavbarState::Shown, nav_events::OCCLUDE) => Some(NavbarState::Hidden),
            (NavbarState::Hidden, nav_events::CLEAR) => Some(NavbarState::Shown),
            _ => None,
        }
    }
}

/// Driver for navbar show/hide
#[derive(Clone)]
pub struct NavbarVisibility {
    state: Arc<Mutex<NavbarState>>,
    visible: State<bool>,
}

impl NavbarVisibility {
    pub fn new(graph: &SharedReactiveGraph) -> Self {
        Self {
            state: Arc::new(Mutex::new(NavbarState::default())),
            visible: State::new(graph, true),
        }
    }

    /// Feed the hero section's visible fraction
    pub fn on_ratio(&self, ratio: f32) {
        let changed = {
            let mut state = self.state.lock().unwrap();
            if ratio >= NAVBAR_HIDE_RATIO {
                state.apply(nav_events::OCCLUDE)
            } else if ratio <= NAVBAR_SHOW_RATIO {
                state.apply(nav_events::CLEAR)
            } else {
                // Hysteresis band: hold the current state
                false
            }
        };
        if changed {
            let visible = *self.state.lock().unwrap() == NavbarState::Shown;
            tracing::debug!(visible, "navbar visibility changed");
            self.visible.set(visible);
        }
    }

    /// Adapter for [`IntersectionObserver::observe`]
    ///
    /// [`IntersectionObserver::observe`]: sightline_viewport::IntersectionObserver::observe
    pub fn ratio_callback(&self) -> impl Fn(f32) + Send + Sync {
        let this = self.clone();
        move |ratio| this.on_ratio(ratio)
    }

    pub fn visible(&self) -> &State<bool> {
        &self.visible
    }
}
