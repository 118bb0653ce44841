//! Engine tunables
//!
//! Every value here is a fixed configuration constant, not derived from
//! layout. Missing keys in a config file fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::overlay::{OverlayExtent, OverlayPlacement};

/// Upper bound for the deferred restore delay
pub const MAX_RESTORE_DELAY_MS: u64 = 1000;

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Amplification of wheel deltas redirected into the panel
    pub wheel_multiplier: f32,
    /// Amplification of touch deltas redirected into the panel
    pub touch_multiplier: f32,
    /// Horizontal drift is suppressed when `|dx| > |dy| * horizontal_ratio`
    pub horizontal_ratio: f32,
    /// Delay between the modal unmounting and the panel offset restore
    pub restore_delay_ms: u64,
    /// Close control placement relative to the anchor
    pub close_control: OverlayPlacement,
    /// Progress indicator placement relative to the anchor
    pub progress_indicator: OverlayPlacement,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wheel_multiplier: 2.5,
            touch_multiplier: 1.0,
            horizontal_ratio: 3.0,
            restore_delay_ms: 100,
            close_control: OverlayPlacement {
                top: 24.0,
                right: 24.0,
                width: 40.0,
                height: OverlayExtent::Fixed { px: 40.0 },
            },
            progress_indicator: OverlayPlacement {
                top: 24.0,
                right: 12.0,
                width: 4.0,
                height: OverlayExtent::Fill { bottom: 24.0 },
            },
        }
    }
}

impl EngineConfig {
    /// Check every tunable is usable
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("wheel_multiplier", self.wheel_multiplier),
            ("touch_multiplier", self.touch_multiplier),
            ("horizontal_ratio", self.horizontal_ratio),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        if self.restore_delay_ms > MAX_RESTORE_DELAY_MS {
            return Err(ConfigError::RestoreDelayTooLong {
                value: self.restore_delay_ms,
                max: MAX_RESTORE_DELAY_MS,
            });
        }

        Ok(())
    }
}
