//! Anchor position sampling
//!
//! Stateless: every call resolves the anchor afresh, so a sample never
//! refers to an element that has since been unmounted.

use vitrine_core::geometry::{Rect, Size};

use crate::host::{ElementHandle, Host};

/// Which element the floating overlays attach to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorPolicy {
    /// Named element preferred when mounted (e.g. the hero image)
    pub preferred: Option<ElementHandle>,
    /// Modal container, always used as the fallback
    pub container: ElementHandle,
}

impl AnchorPolicy {
    pub fn container(container: ElementHandle) -> Self {
        Self {
            preferred: None,
            container,
        }
    }

    pub fn with_preferred(mut self, preferred: ElementHandle) -> Self {
        self.preferred = Some(preferred);
        self
    }
}

/// Which element a sample came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSource {
    Preferred,
    Container,
}

/// One anchor measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorSample {
    pub rect: Rect,
    pub source: AnchorSource,
    pub viewport: Size,
}

/// Resolves an [`AnchorPolicy`] to a screen rectangle
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionSampler;

impl PositionSampler {
    pub fn new() -> Self {
        Self
    }

    /// Sample the anchor rectangle
    ///
    /// The preferred element is used only when mounted and laid out (non-empty);
    /// otherwise the container is measured. Returns None when neither is mounted.
    pub fn sample<H: Host + ?Sized>(&self, host: &H, policy: &AnchorPolicy) -> Option<AnchorSample> {
        let viewport = host.viewport();

        let preferred = policy
            .preferred
            .and_then(|element| host.element_rect(element))
            .filter(|rect| !rect.is_empty());

        let (rect, source) = match preferred {
            Some(rect) => (rect, AnchorSource::Preferred),
            None => (host.element_rect(policy.container)?, AnchorSource::Container),
        };

        Some(AnchorSample {
            rect,
            source,
            viewport,
        })
    }
}
