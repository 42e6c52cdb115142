//! Lifecycle state machines
//!
//! Small enum state machines with explicit transition tables. The pattern:
//! a state enum implements [`StateTransitions`], mapping `(state, event)`
//! pairs to the next state, with `None` meaning "no transition". Events are
//! plain `u32` constants so machines can share an event vocabulary without
//! depending on each other.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum PanelState {
//!     #[default]
//!     Closed,
//!     Open,
//! }
//!
//! impl StateTransitions for PanelState {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (PanelState::Closed, events::ATTACH) => Some(PanelState::Open),
//!             (PanelState::Open, events::DETACH) => Some(PanelState::Closed),
//!             _ => None,
//!         }
//!     }
//! }
//! ```

use std::hash::Hash;

/// Transition table for a state machine enum
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Apply an event in place; returns true if the state changed
    fn apply(&mut self, event: u32) -> bool {
        match self.on_event(event) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }
}

/// Event constants shared by binding lifecycle machines
pub mod events {
    /// Target element found and subscriptions registered
    pub const ATTACH: u32 = 1;
    /// A metrics sample was delivered to the binding
    pub const SAMPLE: u32 = 2;
    /// Subscriptions removed (unmount, readiness lost, target changed)
    pub const DETACH: u32 = 3;
}

/// Effect-binding lifecycle
///
/// ```text
///                 ATTACH              SAMPLE
///  Uninitialized ────────► Attached ─────────► Updated ─┐
///        │                    │                  ▲      │ SAMPLE
///        │ DETACH             │ DETACH           └──────┘
///        ▼                    ▼        DETACH
///     Detached ◄──────────────┴◄─────────────── Updated
/// ```
///
/// `Detached` is terminal for the mount; a fresh binding starts a new
/// `Uninitialized → Attached` cycle. While `Uninitialized`, the target
/// element may not exist yet; attachment is retried on each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindingState {
    /// Created, target not yet found or readiness gate still closed
    #[default]
    Uninitialized,
    /// Subscriptions registered, initial sample delivered
    Attached,
    /// At least one event-driven update has run
    Updated,
    /// Subscriptions removed; terminal for this mount
    Detached,
}

impl BindingState {
    /// Whether subscriptions are currently registered
    pub fn is_attached(&self) -> bool {
        matches!(self, BindingState::Attached | BindingState::Updated)
    }

    /// Whether this mount has been torn down
    pub fn is_detached(&self) -> bool {
        matches!(self, BindingState::Detached)
    }
}

impl StateTransitions for BindingState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use events::*;

        match (self, event) {
            (BindingState::Uninitialized, ATTACH) => Some(BindingState::Attached),

            // A sample before attach is dropped by the guard, not a transition
            (BindingState::Attached, SAMPLE) => Some(BindingState::Updated),
            (BindingState::Updated, SAMPLE) => None,

            // Detach is legal from any live state, including an
            // uninitialized binding whose target never appeared
            (BindingState::Uninitialized, DETACH) => Some(BindingState::Detached),
            (BindingState::Attached, DETACH) => Some(BindingState::Detached),
            (BindingState::Updated, DETACH) => Some(BindingState::Detached),

            // Terminal: nothing revives a detached mount
            (BindingState::Detached, _) => None,

            _ => None,
        }
    }
}
