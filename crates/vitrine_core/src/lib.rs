//! Vitrine Core
//!
//! Foundational primitives shared by the Vitrine crates:
//!
//! - **Geometry**: viewport-space points, sizes, and rectangles
//! - **Events**: raw wheel/touch input and event type identifiers
//! - **State Transitions**: enum-based state machines driven by event ids
//! - **Task Arena**: timers, frame loops, and listeners tagged with an owning
//!   session so they can be released en masse
//!
//! # Example
//!
//! ```rust
//! use vitrine_core::geometry::{Point, Rect};
//!
//! let panel = Rect::new(0.0, 640.0, 640.0, 800.0);
//! assert!(panel.contains(Point::new(700.0, 100.0)));
//! assert!(!panel.contains(Point::new(100.0, 100.0)));
//! ```

pub mod events;
pub mod geometry;
pub mod scheduler;
pub mod state;

pub use events::{event_types, EventType, InputAxis, ScrollInput};
pub use geometry::{Point, Rect, Size};
pub use scheduler::{ListenerKind, SessionId, TaskArena, TaskId};
pub use state::StateTransitions;
