//! Sightline Effect Drivers
//!
//! The concrete scroll-linked effects a landing page composes out of the
//! viewport controller:
//!
//! - [`ProgressRing`]: back-to-top button with a 1:1 scroll-progress ring
//! - [`FloatingCluster`]: fixed contact buttons with threshold visibility
//!   and section-aware theme swapping
//! - [`Odometer`]: digit-rolling statistics counters (animate once)
//! - [`NavbarVisibility`]: hero-occlusion navbar show/hide with hysteresis
//! - [`HeadingReveal`]: staggered word-by-word heading fade-in, gated on
//!   content readiness
//! - [`FooterReveal`]: spring-smoothed footer slide-in near the page end
//! - [`PinnedPanel`]: vertical-to-horizontal pinned scroll mapping
//!
//! Every driver owns its outputs exclusively ([`sightline_core::State`]
//! values or scheduler-backed animations) and mutates nothing else; wiring
//! to the hub/observer goes through [`sightline_viewport::Binding`] or the
//! drivers' `*_callback()` adapters.

pub mod floating;
pub mod footer;
pub mod navbar;
pub mod odometer;
pub mod pinned;
pub mod progress_ring;
pub mod reveal;

pub use floating::{ClusterTheme, FloatingCluster};
pub use footer::{FooterReveal, FOOTER_REVEAL_PROGRESS};
pub use navbar::{NavbarVisibility, NAVBAR_HIDE_RATIO, NAVBAR_SHOW_RATIO};
pub use odometer::Odometer;
pub use pinned::PinnedPanel;
pub use progress_ring::{ProgressRing, DEFAULT_RING_RADIUS};
pub use reveal::{HeadingReveal, RevealConfig};
