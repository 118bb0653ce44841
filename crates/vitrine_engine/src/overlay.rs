//! Dependent overlay geometry
//!
//! Floating controls (close button, progress bar) are not laid out by the
//! document. Their rectangles are derived from the anchor rectangle plus
//! fixed pixel offsets, CSS `position: fixed` style: `top` from the viewport
//! top and `right` from the viewport right edge.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vitrine_core::geometry::{Rect, Size};

use crate::sampler::{AnchorSample, AnchorSource};

/// Which dependent overlay a rectangle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayId {
    CloseControl,
    ProgressIndicator,
}

impl OverlayId {
    pub fn name(&self) -> &'static str {
        match self {
            OverlayId::CloseControl => "close_control",
            OverlayId::ProgressIndicator => "progress_indicator",
        }
    }
}

/// Height of a dependent overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayExtent {
    /// Fixed height in pixels
    Fixed { px: f32 },
    /// Stretch from the top offset down to `bottom` pixels above the anchor's bottom edge
    Fill { bottom: f32 },
}

/// Offsets of a dependent overlay from the anchor's top-right corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    /// Distance below the anchor's top edge
    pub top: f32,
    /// Distance left of the anchor's right edge
    pub right: f32,
    pub width: f32,
    pub height: OverlayExtent,
}

/// A dependent overlay to keep glued to the anchor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DependentOverlaySpec {
    pub id: OverlayId,
    pub placement: OverlayPlacement,
}

impl DependentOverlaySpec {
    pub fn new(id: OverlayId, placement: OverlayPlacement) -> Self {
        Self { id, placement }
    }

    /// Derive the overlay rectangle from an anchor rectangle
    pub fn resolve(&self, anchor: &Rect, viewport: Size) -> DependentOverlayRect {
        let p = &self.placement;
        let height = match p.height {
            OverlayExtent::Fixed { px } => px,
            OverlayExtent::Fill { bottom } => (anchor.height - p.top - bottom).max(0.0),
        };
        DependentOverlayRect {
            top: anchor.top + p.top,
            right: viewport.width - anchor.right() + p.right,
            width: p.width,
            height,
        }
    }
}

/// Overlay rectangle in fixed-position terms
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DependentOverlayRect {
    pub top: f32,
    /// Distance from the viewport's right edge to the overlay's right edge
    pub right: f32,
    pub width: f32,
    pub height: f32,
}

impl DependentOverlayRect {
    /// Convert to a top/left rectangle for a viewport of the given width
    pub fn to_rect(&self, viewport_width: f32) -> Rect {
        Rect::new(
            self.top,
            viewport_width - self.right - self.width,
            self.width,
            self.height,
        )
    }

    fn approx_eq(&self, other: &DependentOverlayRect) -> bool {
        const EPS: f32 = 0.01;
        (self.top - other.top).abs() <= EPS
            && (self.right - other.right).abs() <= EPS
            && (self.width - other.width).abs() <= EPS
            && (self.height - other.height).abs() <= EPS
    }
}

/// Everything the presentation layer needs to place the floating controls
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    pub anchor: Rect,
    pub anchor_source: AnchorSource,
    pub viewport: Size,
    pub overlays: SmallVec<[(OverlayId, DependentOverlayRect); 2]>,
}

impl OverlayLayout {
    /// Resolve every dependent against one anchor sample
    pub fn compute(sample: &AnchorSample, dependents: &[DependentOverlaySpec]) -> Self {
        Self {
            anchor: sample.rect,
            anchor_source: sample.source,
            viewport: sample.viewport,
            overlays: dependents
                .iter()
                .map(|spec| (spec.id, spec.resolve(&sample.rect, sample.viewport)))
                .collect(),
        }
    }

    pub fn get(&self, id: OverlayId) -> Option<&DependentOverlayRect> {
        self.overlays
            .iter()
            .find_map(|(overlay, rect)| (*overlay == id).then_some(rect))
    }

    /// Equal up to sub-pixel noise; used to skip redundant publishes
    pub fn same_placement(&self, other: &OverlayLayout) -> bool {
        self.anchor_source == other.anchor_source
            && self.viewport == other.viewport
            && self.anchor.approx_eq(&other.anchor, 0.01)
            && self.overlays.len() == other.overlays.len()
            && self
                .overlays
                .iter()
                .zip(other.overlays.iter())
                .all(|((a_id, a), (b_id, b))| a_id == b_id && a.approx_eq(b))
    }
}
