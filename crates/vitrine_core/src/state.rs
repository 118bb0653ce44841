//! Enum-based state machines
//!
//! A state type maps `(state, event)` pairs to the next state:
//!
//! ```rust
//! use vitrine_core::event_types::*;
//! use vitrine_core::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
//! enum Door {
//!     Shut,
//!     Ajar,
//! }
//!
//! impl StateTransitions for Door {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (Door::Shut, OPEN_REQUEST) => Some(Door::Ajar),
//!             (Door::Ajar, CLOSE_REQUEST) => Some(Door::Shut),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut door = Door::Shut;
//! assert!(door.apply(OPEN_REQUEST));
//! assert_eq!(door, Door::Ajar);
//! assert!(!door.apply(OPEN_REQUEST));
//! ```

use std::hash::Hash;

/// Trait for state types that handle event transitions
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;

    /// Apply an event in place, returning whether a transition happened
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
