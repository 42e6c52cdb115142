//! Sightline Core Runtime
//!
//! Foundational primitives for the Sightline viewport-signal library:
//!
//! - **Reactive Signals**: push-pull signal graph for driver-local UI state
//! - **State Machines**: transition-table lifecycle machines for bindings
//! - **Geometry**: points, sizes, and rects with intersection queries
//! - **Load Gate**: the injected content-readiness flag that keeps
//!   scroll-linked effects dormant until data has arrived
//!
//! # Example
//!
//! ```rust
//! use sightline_core::reactive::ReactiveGraph;
//!
//! let mut graph = ReactiveGraph::new();
//!
//! let scroll_top = graph.create_signal(0.0f32);
//! let past_fold = graph.create_derived(move |g| {
//!     g.get(scroll_top).unwrap_or(0.0) > 500.0
//! });
//!
//! graph.set(scroll_top, 750.0);
//! assert_eq!(graph.get_derived(past_fold), Some(true));
//! ```

pub mod error;
pub mod fsm;
pub mod gate;
pub mod geometry;
pub mod reactive;

pub use error::{Error, Result};
pub use fsm::{events, BindingState, StateTransitions};
pub use gate::{GateSubscription, LoadGate};
pub use geometry::{Point, Rect, Size};
pub use reactive::{
    Derived, DerivedId, Effect, EffectId, GraphStats, ReactiveGraph, SharedReactiveGraph, Signal,
    SignalId, State, SubscriberId,
};
