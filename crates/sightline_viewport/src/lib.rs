//! Sightline Viewport Controller
//!
//! The viewport-driven state controller: sample scroll position, derive
//! normalized signals, and manage the subscriptions that feed effect
//! drivers, with teardown guaranteed.
//!
//! # Anatomy
//!
//! - [`metrics`]: the [`ScrollMetrics`] snapshot and the [`ViewportHost`]
//!   seam a windowing shell or webview bridge implements
//! - [`derive`]: pure metric → signal functions (progress ratio, threshold,
//!   point-in-rect membership, intersection ratio, odometer targets)
//! - [`hub`]: the shared scroll observable: one layout read per event,
//!   fanned out to subscribers in registration order
//! - [`intersection`]: visible-fraction observation per element
//! - [`binding`]: the per-component lifecycle guard
//! - [`external`]: scoped ownership of third-party scroll library instances
//! - [`config`]: TOML-loadable tunables
//!
//! # Example
//!
//! ```ignore
//! let hub = ScrollHub::new(host);
//! let mut binding = Binding::new(hub.clone(), |metrics, _| {
//!     let progress = derive::page_progress(metrics);
//!     // feed an effect driver
//! });
//! binding.poll_attach();
//!
//! // host event loop:
//! hub.publish();
//! ```

pub mod binding;
pub mod config;
pub mod derive;
pub mod external;
pub mod hub;
pub mod intersection;
pub mod metrics;

pub use binding::{Binding, SampleCallback};
pub use config::{OdometerConfig, ViewportConfig};
pub use external::{PluginMount, ScrollPlugin};
pub use hub::{HubSubscription, ScrollHub, SubscriptionId};
pub use intersection::{IntersectionObserver, ObserverRegistration};
pub use metrics::{sample_element, ElementSample, ScrollMetrics, SharedHost, ViewportHost};
