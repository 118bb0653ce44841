//! Input events
//!
//! Raw wheel/touch input as delivered by the document, plus the event type
//! identifiers that drive the modal state machine.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Event type identifier
pub type EventType = u32;

/// Modal lifecycle event types
pub mod event_types {
    use super::EventType;

    pub const OPEN_REQUEST: EventType = 40;
    /// Entrance animation settled
    pub const ENTRANCE_COMPLETE: EventType = 41;
    /// Backdrop click, close control click, or cancel key
    pub const CLOSE_REQUEST: EventType = 42;
    /// Exit animation settled and the modal is unmounted
    pub const EXIT_COMPLETE: EventType = 43;
}

/// Which input device produced a scroll gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputAxis {
    Wheel,
    Touch,
}

/// A scroll gesture sample routed by the scroll gateway
///
/// Deltas follow wheel conventions: positive `delta_y` scrolls content down
/// (the offset grows).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollInput {
    pub axis: InputAxis,
    pub delta_x: f32,
    pub delta_y: f32,
    pub pointer: Point,
}

impl ScrollInput {
    /// Wheel input at a pointer location
    pub fn wheel(delta_x: f32, delta_y: f32, pointer: Point) -> Self {
        Self {
            axis: InputAxis::Wheel,
            delta_x,
            delta_y,
            pointer,
        }
    }

    /// Touch-move input, already converted to a scroll delta
    pub fn touch(delta_x: f32, delta_y: f32, pointer: Point) -> Self {
        Self {
            axis: InputAxis::Touch,
            delta_x,
            delta_y,
            pointer,
        }
    }
}
