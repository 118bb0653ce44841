//! Headless stage
//!
//! A simulated showcase document: an outer page whose hero section can be
//! smooth-scrolled back into view, a right-hand project panel listing the
//! gallery cards, and the detail modal. The modal grows out of its card on
//! a spring and shrinks back into it on close; the settle of each spring is
//! reported as a [`StageSignal`].

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use vitrine_animation::{Spring, SpringConfig};
use vitrine_core::geometry::{Point, Rect, Size};
use vitrine_core::scheduler::SessionId;
use vitrine_engine::{AnchorPolicy, ElementHandle, Host, ProjectId, ScrollPosition};

/// Modal container element
pub const MODAL_CONTAINER: ElementHandle = ElementHandle(1);
/// Hero image inside the modal, mounted once its image has loaded
pub const MODAL_HERO: ElementHandle = ElementHandle(2);

/// Stage dimensions and behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Height of the page hero section; the page starts scrolled past it
    pub hero_section_height: f32,
    pub panel_content_height: f32,
    /// Vertical pitch of the gallery cards in the panel
    pub card_height: f32,
    pub modal_width: f32,
    /// Gap between the open modal and the viewport top/bottom edges
    pub modal_margin: f32,
    pub hero_image_height: f32,
    pub modal_content_height: f32,
    /// Unmounting the modal drops the panel offset, as a full re-render does
    pub reset_panel_on_unmount: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1280.0,
            viewport_height: 800.0,
            hero_section_height: 720.0,
            panel_content_height: 3200.0,
            card_height: 420.0,
            modal_width: 960.0,
            modal_margin: 48.0,
            hero_image_height: 480.0,
            modal_content_height: 2400.0,
            reset_panel_on_unmount: true,
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.viewport_width > 0.0 && self.viewport_height > 0.0) {
            bail!("stage viewport must be non-empty");
        }
        if !(self.card_height > 0.0 && self.modal_width > 0.0) {
            bail!("stage card_height and modal_width must be positive");
        }
        if self.modal_margin < 0.0 || self.modal_margin * 2.0 >= self.viewport_height {
            bail!("stage modal_margin must leave room for the modal");
        }
        Ok(())
    }
}

/// Animation settle notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    EntranceSettled(SessionId),
    ExitSettled(SessionId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModalPhase {
    Entering,
    Shown,
    Leaving,
}

struct StageModal {
    session: SessionId,
    /// Card rectangle the modal grew out of
    origin: Rect,
    /// 0 at the card, 1 fully open
    spring: Spring,
    phase: ModalPhase,
    hero_loaded: bool,
    content_offset: f32,
    content_height: f32,
}

/// Simulated document implementing [`Host`]
pub struct HeadlessStage {
    config: StageConfig,
    viewport: Size,
    page: Spring,
    panel_offset: f32,
    modal: Option<StageModal>,
}

impl HeadlessStage {
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            viewport: Size::new(config.viewport_width, config.viewport_height),
            page: Spring::new(SpringConfig::stiff(), config.hero_section_height).with_rest_threshold(0.5),
            panel_offset: 0.0,
            modal: None,
            config,
        })
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    // =========================================================================
    // Page and panel
    // =========================================================================

    pub fn page_offset(&self) -> f32 {
        self.page.value()
    }

    pub fn panel_offset(&self) -> f32 {
        self.panel_offset
    }

    pub fn panel_max(&self) -> f32 {
        (self.config.panel_content_height - self.viewport.height).max(0.0)
    }

    /// User scroll of the panel itself
    pub fn scroll_panel_to(&mut self, offset: f32) {
        self.panel_offset = offset.clamp(0.0, self.panel_max());
    }

    pub fn scroll_panel_by(&mut self, delta: f32) {
        self.scroll_panel_to(self.panel_offset + delta);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width.max(1.0), height.max(1.0));
        self.panel_offset = self.panel_offset.min(self.panel_max());
    }

    /// Gallery card rectangle at the current panel offset
    pub fn card_rect(&self, index: usize) -> Rect {
        let panel = self.panel_rect();
        Rect::new(
            index as f32 * self.config.card_height - self.panel_offset + 24.0,
            panel.left + 24.0,
            (panel.width - 48.0).max(0.0),
            (self.config.card_height - 48.0).max(0.0),
        )
    }

    // =========================================================================
    // Modal
    // =========================================================================

    /// Mount the modal for a session, growing out of a gallery card
    pub fn present_modal(&mut self, session: SessionId, card_index: usize) {
        let mut spring = Spring::new(SpringConfig::snappy(), 0.0);
        spring.set_target(1.0);
        self.modal = Some(StageModal {
            session,
            origin: self.card_rect(card_index),
            spring,
            phase: ModalPhase::Entering,
            hero_loaded: false,
            content_offset: 0.0,
            content_height: self.config.modal_content_height,
        });
        tracing::debug!("stage: modal mounted for {}", session);
    }

    /// Start the exit animation back into the card
    pub fn dismiss_modal(&mut self) -> bool {
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        modal.phase = ModalPhase::Leaving;
        modal.spring.set_target(0.0);
        true
    }

    pub fn is_modal_mounted(&self) -> bool {
        self.modal.is_some()
    }

    pub fn modal_session(&self) -> Option<SessionId> {
        self.modal.as_ref().map(|m| m.session)
    }

    /// Fully open modal rectangle, centered in the viewport
    pub fn modal_target_rect(&self) -> Rect {
        let margin = self.config.modal_margin;
        let width = self
            .config
            .modal_width
            .min(self.viewport.width - margin * 2.0)
            .max(0.0);
        let height = (self.viewport.height - margin * 2.0).max(0.0);
        Rect::new(margin, (self.viewport.width - width) / 2.0, width, height)
    }

    /// Current modal container rectangle
    pub fn modal_rect(&self) -> Option<Rect> {
        let modal = self.modal.as_ref()?;
        Some(modal.origin.lerp(&self.modal_target_rect(), modal.spring.value()))
    }

    fn hero_rect(&self) -> Option<Rect> {
        let modal = self.modal.as_ref().filter(|m| m.hero_loaded)?;
        let container = self.modal_rect()?;
        Some(Rect::new(
            container.top - modal.content_offset,
            container.left,
            container.width,
            self.config.hero_image_height.min(modal.content_height),
        ))
    }

    /// The hero image finished loading
    pub fn load_hero(&mut self) -> bool {
        match self.modal.as_mut() {
            Some(modal) if !modal.hero_loaded => {
                modal.hero_loaded = true;
                true
            }
            _ => false,
        }
    }

    /// Change the modal content height (late content, expanded sections)
    pub fn set_modal_content_height(&mut self, height: f32) -> bool {
        let client = self.modal_rect().map_or(0.0, |r| r.height);
        let Some(modal) = self.modal.as_mut() else {
            return false;
        };
        modal.content_height = height.max(0.0);
        let max = (modal.content_height - client).max(0.0);
        modal.content_offset = modal.content_offset.min(max);
        true
    }

    /// Modal content scroll metrics: session, scroll top, scroll height, client height
    pub fn modal_scroll_metrics(&self) -> Option<(SessionId, f32, f32, f32)> {
        let client = self.modal_rect()?.height;
        let modal = self.modal.as_ref()?;
        Some((modal.session, modal.content_offset, modal.content_height, client))
    }

    /// Scroll the modal content to a fraction of its range
    pub fn scroll_modal_to(&mut self, fraction: f32) -> Option<(SessionId, f32, f32, f32)> {
        let (_, _, height, client) = self.modal_scroll_metrics()?;
        let max = (height - client).max(0.0);
        if let Some(modal) = self.modal.as_mut() {
            modal.content_offset = fraction.clamp(0.0, 1.0) * max;
        }
        self.modal_scroll_metrics()
    }

    /// Native wheel scroll of the modal content
    pub fn scroll_modal_by(&mut self, delta: f32) -> Option<(SessionId, f32, f32, f32)> {
        let (_, top, height, client) = self.modal_scroll_metrics()?;
        let max = (height - client).max(0.0);
        if let Some(modal) = self.modal.as_mut() {
            modal.content_offset = (top + delta).clamp(0.0, max);
        }
        self.modal_scroll_metrics()
    }

    pub fn modal_contains(&self, point: Point) -> bool {
        self.modal_rect().is_some_and(|rect| rect.contains(point))
    }

    fn unmount_modal(&mut self) {
        self.modal = None;
        if self.config.reset_panel_on_unmount {
            self.panel_offset = 0.0;
        }
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Step every spring by `dt` seconds and report settled animations
    pub fn advance(&mut self, dt: f32) -> Option<StageSignal> {
        self.page.step(dt);

        let modal = self.modal.as_mut()?;
        modal.spring.step(dt);
        if !modal.spring.is_settled() {
            return None;
        }

        let session = modal.session;
        let phase = modal.phase;
        match phase {
            ModalPhase::Entering => {
                modal.phase = ModalPhase::Shown;
                Some(StageSignal::EntranceSettled(session))
            }
            ModalPhase::Leaving => {
                self.unmount_modal();
                tracing::debug!("stage: modal unmounted for {}", session);
                Some(StageSignal::ExitSettled(session))
            }
            ModalPhase::Shown => None,
        }
    }

    /// Signals for several frames at once
    pub fn advance_frames(&mut self, frames: u32, dt: f32) -> SmallVec<[StageSignal; 2]> {
        (0..frames).filter_map(|_| self.advance(dt)).collect()
    }
}

impl Host for HeadlessStage {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn element_rect(&self, element: ElementHandle) -> Option<Rect> {
        match element {
            MODAL_CONTAINER => self.modal_rect(),
            MODAL_HERO => self.hero_rect(),
            _ => None,
        }
    }

    fn anchor_policy(&self, _project: &ProjectId) -> AnchorPolicy {
        AnchorPolicy::container(MODAL_CONTAINER).with_preferred(MODAL_HERO)
    }

    fn panel_rect(&self) -> Rect {
        let half = self.viewport.width / 2.0;
        Rect::new(0.0, half, half, self.viewport.height)
    }

    fn panel_scroll(&self) -> ScrollPosition {
        ScrollPosition::new(self.panel_offset, self.panel_max())
    }

    fn set_panel_offset(&mut self, offset: f32) {
        self.scroll_panel_to(offset);
    }

    fn scroll_page_to_top(&mut self) {
        self.page.set_target(0.0);
    }
}
