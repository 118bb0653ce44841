//! Scroll domains and positions

use serde::{Deserialize, Serialize};

/// Which scrollable region an input event affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDomain {
    /// The outer page (hero section above the panel)
    Page,
    /// The inner project panel
    Panel,
    /// Nothing is scrolled by the gateway
    #[default]
    None,
}

/// Offset of a scrollable region and its maximum
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollPosition {
    pub offset: f32,
    pub max: f32,
}

impl ScrollPosition {
    pub fn new(offset: f32, max: f32) -> Self {
        Self { offset, max }
    }

    /// Offset as a fraction of the scrollable range, in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.offset / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Clamp an offset to `[0, max]`
    pub fn clamp(&self, offset: f32) -> f32 {
        offset.clamp(0.0, self.max.max(0.0))
    }

    pub fn at_top(&self) -> bool {
        self.offset <= 0.0
    }
}
