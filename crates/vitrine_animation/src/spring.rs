//! Damped spring
//!
//! `F = -stiffness * (position - target) - damping * velocity`, integrated
//! with semi-implicit Euler. Steps longer than [`MAX_STEP_SECS`] are
//! subdivided so stiff springs stay stable when a frame runs long.

use serde::{Deserialize, Serialize};

/// Longest single integration step (4ms)
const MAX_STEP_SECS: f32 = 0.004;

/// Spring parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness: stiffness.max(0.1),
            damping: damping.max(0.0),
            mass: mass.max(0.001),
        }
    }

    /// Fast, no visible overshoot
    pub fn stiff() -> Self {
        Self::new(400.0, 38.0, 1.0)
    }

    /// Quick with a small overshoot, used for modal entrance
    pub fn snappy() -> Self {
        Self::new(300.0, 24.0, 1.0)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::snappy()
    }
}

/// A spring animating a single value toward a target
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    rest_threshold: f32,
    settled: bool,
}

impl Spring {
    /// Create a spring at rest at `initial`
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            rest_threshold: 0.001,
            settled: true,
        }
    }

    /// Distance (and speed) below which the spring snaps to its target
    pub fn with_rest_threshold(mut self, threshold: f32) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Retarget the spring, keeping its current velocity
    pub fn set_target(&mut self, target: f32) {
        if (self.target - target).abs() > f32::EPSILON {
            self.target = target;
            self.settled = false;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Advance the simulation by `dt` seconds
    pub fn step(&mut self, dt: f32) {
        if self.settled || dt <= 0.0 {
            return;
        }

        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP_SECS);
            let displacement = self.value - self.target;
            let force = -self.config.stiffness * displacement - self.config.damping * self.velocity;
            self.velocity += force / self.config.mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }

        if (self.value - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.rest_threshold * 10.0
        {
            self.value = self.target;
            self.velocity = 0.0;
            self.settled = true;
            tracing::trace!("spring settled at {:.3}", self.target);
        }
    }
}
