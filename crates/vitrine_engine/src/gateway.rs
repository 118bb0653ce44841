//! Scroll gateway
//!
//! Document-level wheel/touch delegation. Each input event is routed to
//! exactly one scroll domain:
//!
//! 1. Mostly-horizontal input is treated as drift: default handling is
//!    suppressed and nothing scrolls.
//! 2. While a modal is active nothing is routed; the modal's own content
//!    region scrolls natively.
//! 3. Input over the panel scrolls the panel natively.
//! 4. Upward input elsewhere with the panel at its top scrolls the page back
//!    to the top, revealing the hero section.
//! 5. Any other input elsewhere is redirected into the panel, amplified.
//!
//! While a modal is active the redirect listener is detached entirely; only
//! the horizontal-drift guard stays installed.

use vitrine_core::events::{InputAxis, ScrollInput};
use vitrine_core::geometry::{Point, Rect};

use crate::config::EngineConfig;
use crate::scroll::{ScrollDomain, ScrollPosition};

/// Outcome of routing one input event
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteDecision {
    pub domain: ScrollDomain,
    /// Whether the document's default scroll handling is prevented
    pub consumed_default: bool,
    /// Amplified delta to add to the panel offset (case 5 only)
    pub panel_scroll_delta: Option<f32>,
}

impl RouteDecision {
    /// Leave the event to native scrolling
    pub fn native(domain: ScrollDomain) -> Self {
        Self {
            domain,
            consumed_default: false,
            panel_scroll_delta: None,
        }
    }

    /// Swallow the event without scrolling anything
    pub fn suppressed() -> Self {
        Self {
            domain: ScrollDomain::None,
            consumed_default: true,
            panel_scroll_delta: None,
        }
    }

    /// Scroll the page to its top
    pub fn page() -> Self {
        Self {
            domain: ScrollDomain::Page,
            consumed_default: true,
            panel_scroll_delta: None,
        }
    }

    /// Redirect into the panel by `delta`
    pub fn panel_redirect(delta: f32) -> Self {
        Self {
            domain: ScrollDomain::Panel,
            consumed_default: true,
            panel_scroll_delta: Some(delta),
        }
    }

    /// Panel offset after applying the redirect, clamped to `[0, max]`
    pub fn resolve_panel_offset(&self, scroll: ScrollPosition) -> Option<f32> {
        self.panel_scroll_delta
            .map(|delta| scroll.clamp(scroll.offset + delta))
    }
}

/// Routing tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GatewayConfig {
    pub wheel_multiplier: f32,
    pub touch_multiplier: f32,
    pub horizontal_ratio: f32,
}

impl From<&EngineConfig> for GatewayConfig {
    fn from(config: &EngineConfig) -> Self {
        Self {
            wheel_multiplier: config.wheel_multiplier,
            touch_multiplier: config.touch_multiplier,
            horizontal_ratio: config.horizontal_ratio,
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::from(&EngineConfig::default())
    }
}

/// Document-level scroll router
#[derive(Debug, Clone)]
pub struct ScrollGateway {
    config: GatewayConfig,
    /// Whether the wheel/touch redirect listener is attached
    attached: bool,
    last_touch: Option<Point>,
}

impl ScrollGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            attached: true,
            last_touch: None,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Install the redirect listener
    pub fn attach(&mut self) {
        if !self.attached {
            tracing::debug!("scroll gateway: redirect listener attached");
        }
        self.attached = true;
    }

    /// Remove the redirect listener and forget any touch in progress
    pub fn detach(&mut self) {
        if self.attached {
            tracing::debug!("scroll gateway: redirect listener detached");
        }
        self.attached = false;
        self.last_touch = None;
    }

    /// Check whether the horizontal component dominates the vertical one
    pub fn is_horizontal_drift(&self, delta_x: f32, delta_y: f32) -> bool {
        delta_x.abs() > delta_y.abs() * self.config.horizontal_ratio
    }

    /// Route one input event
    pub fn route(
        &self,
        input: &ScrollInput,
        panel_rect: Rect,
        panel_scroll: ScrollPosition,
        modal_active: bool,
    ) -> RouteDecision {
        if self.is_horizontal_drift(input.delta_x, input.delta_y) {
            return RouteDecision::suppressed();
        }

        if modal_active {
            return RouteDecision::native(ScrollDomain::None);
        }

        if panel_rect.contains(input.pointer) {
            return RouteDecision::native(ScrollDomain::Panel);
        }

        if input.delta_y < 0.0 && panel_scroll.at_top() {
            return RouteDecision::page();
        }

        let multiplier = match input.axis {
            InputAxis::Wheel => self.config.wheel_multiplier,
            InputAxis::Touch => self.config.touch_multiplier,
        };
        RouteDecision::panel_redirect(input.delta_y * multiplier)
    }

    /// Route through whichever listeners are currently installed
    ///
    /// With the redirect listener detached only drift suppression applies;
    /// everything else is left to native scrolling.
    pub fn dispatch(
        &self,
        input: &ScrollInput,
        panel_rect: Rect,
        panel_scroll: ScrollPosition,
        modal_active: bool,
    ) -> RouteDecision {
        if !self.attached {
            return if self.is_horizontal_drift(input.delta_x, input.delta_y) {
                RouteDecision::suppressed()
            } else {
                RouteDecision::native(ScrollDomain::None)
            };
        }
        self.route(input, panel_rect, panel_scroll, modal_active)
    }

    /// Begin a touch gesture
    ///
    /// Tracked whether or not the redirect listener is attached; native
    /// scrolling inside the modal still needs the finger deltas.
    pub fn touch_start(&mut self, point: Point) {
        self.last_touch = Some(point);
    }

    /// Convert a touch move into a scroll input
    ///
    /// Dragging the finger up scrolls content down, so the delta is the
    /// previous point minus the current one.
    pub fn touch_move(&mut self, point: Point) -> Option<ScrollInput> {
        let last = self.last_touch.as_mut()?;
        let input = ScrollInput::touch(last.x - point.x, last.y - point.y, point);
        *last = point;
        Some(input)
    }

    pub fn touch_end(&mut self) {
        self.last_touch = None;
    }
}

impl Default for ScrollGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}
