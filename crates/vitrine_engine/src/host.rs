//! Document seam
//!
//! The engine never owns the document. Geometry queries and the two scroll
//! mutations it is allowed to perform go through [`Host`]. A browser binding
//! and the headless stage implement it the same way.

use serde::{Deserialize, Serialize};
use vitrine_core::geometry::{Rect, Size};

use crate::catalog::ProjectId;
use crate::sampler::AnchorPolicy;
use crate::scroll::ScrollPosition;

/// Opaque reference to a document element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Geometry and scroll access to the document
pub trait Host {
    /// Current viewport size
    fn viewport(&self) -> Size;

    /// Bounding rectangle of an element, or None when it is not mounted
    fn element_rect(&self, element: ElementHandle) -> Option<Rect>;

    /// Which elements anchor the modal for a project
    fn anchor_policy(&self, project: &ProjectId) -> AnchorPolicy;

    /// Bounding rectangle of the scrollable panel
    fn panel_rect(&self) -> Rect;

    /// Panel scroll offset and maximum
    fn panel_scroll(&self) -> ScrollPosition;

    /// Write the panel scroll offset (already clamped by the caller)
    fn set_panel_offset(&mut self, offset: f32);

    /// Start a smooth scroll of the outer page to its top
    fn scroll_page_to_top(&mut self);
}
