//! Showcase engine
//!
//! Wires the scroll gateway, modal lifecycle, overlay tracker, progress
//! computation, and panel preserver together behind one facade. The
//! document is reached only through [`Host`].
//!
//! All timers, frame loops, and listeners a session starts live in one
//! [`TaskArena`] tagged with the session id and are released together when
//! the session ends.

use vitrine_core::events::ScrollInput;
use vitrine_core::geometry::Point;
use vitrine_core::scheduler::{ListenerKind, SessionId, TaskArena};

use crate::catalog::{ProjectCatalog, ProjectId};
use crate::config::EngineConfig;
use crate::error::{OpenRejected, Result};
use crate::gateway::{GatewayConfig, RouteDecision, ScrollGateway};
use crate::host::Host;
use crate::modal::{CloseReason, Effects, LifecycleEffect, ModalLifecycleController, ModalSession, ModalState};
use crate::overlay::{DependentOverlaySpec, OverlayId, OverlayLayout};
use crate::progress::ProgressComputation;
use crate::scroll::ScrollDomain;
use crate::tracker::{Invalidation, OverlayPositionTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    /// Per-frame anchor resample
    Resample,
    /// Deferred panel offset restore
    RestorePanel,
}

/// Scroll-domain coordination and overlay synchronization
pub struct ShowcaseEngine {
    config: EngineConfig,
    catalog: ProjectCatalog,
    gateway: ScrollGateway,
    controller: ModalLifecycleController,
    tracker: OverlayPositionTracker,
    progress: ProgressComputation,
    tasks: TaskArena<EngineTask>,
    now_ms: u64,
    frame: u64,
}

impl ShowcaseEngine {
    /// Create an engine with validated configuration and the default catalog
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            gateway: ScrollGateway::new(GatewayConfig::from(&config)),
            controller: ModalLifecycleController::new(config.restore_delay_ms),
            tracker: OverlayPositionTracker::new(),
            progress: ProgressComputation::new(),
            tasks: TaskArena::new(),
            catalog: ProjectCatalog::default(),
            config,
            now_ms: 0,
            frame: 0,
        }
    }

    /// Replace the project catalog
    pub fn with_catalog(mut self, catalog: ProjectCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    // =========================================================================
    // Modal lifecycle
    // =========================================================================

    /// Open the detail modal for a project
    ///
    /// The panel offset is captured before anything else can mutate it. A
    /// restore still pending from the previous session is applied first.
    ///
    /// No layout is sampled here because the modal is not mounted yet. The
    /// caller delivers [`Invalidation::Mount`] through [`Self::notify`] once
    /// the card is in the document.
    pub fn open_modal<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        project: &str,
    ) -> std::result::Result<SessionId, OpenRejected> {
        let Some(entry) = self.catalog.get(project) else {
            tracing::debug!("engine: open-request for unknown project {:?}", project);
            return Err(OpenRejected::UnknownProject(ProjectId::new(project)));
        };
        let project = ProjectId::new(entry.id);

        self.flush_pending_restore(host);

        let anchor = host.anchor_policy(&project);
        let panel_offset = host.panel_scroll().offset;
        let (session, effects) = match self.controller.request_open(project, anchor, panel_offset) {
            Ok(opened) => opened,
            Err(rejected) => {
                tracing::debug!("engine: {}", rejected);
                return Err(rejected);
            }
        };

        self.progress.reset(session);
        self.apply(effects);
        Ok(session)
    }

    /// Dismiss the modal; the panel is left untouched until the exit settles
    pub fn close_modal(&mut self, reason: CloseReason) -> bool {
        self.controller.request_close(reason)
    }

    /// Entrance animation settled for `session`
    pub fn entrance_settled(&mut self, session: SessionId) -> bool {
        self.controller.entrance_complete(session)
    }

    /// Exit animation settled and the modal unmounted for `session`
    pub fn exit_settled(&mut self, session: SessionId) -> bool {
        let effects = self.controller.exit_complete(session);
        if effects.is_empty() {
            return false;
        }
        self.progress.clear();
        self.apply(effects);
        true
    }

    fn apply(&mut self, effects: Effects) {
        for effect in effects {
            match effect {
                LifecycleEffect::DetachWheelListener => self.gateway.detach(),
                LifecycleEffect::StartTracking { session, anchor } => {
                    let dependents = self.dependents();
                    self.tracker.start(session, anchor, &dependents);
                    self.tasks.start_frame_loop(session, EngineTask::Resample);
                    for kind in ListenerKind::ALL {
                        self.tasks.attach_listener(session, kind);
                    }
                }
                LifecycleEffect::StopTracking { .. } => {
                    self.tracker.stop();
                }
                LifecycleEffect::ReleaseSession { session } => {
                    self.tasks.release(session);
                }
                LifecycleEffect::AttachWheelListener => self.gateway.attach(),
                // Armed by the next frame, so the delay counts from then
                LifecycleEffect::ScheduleRestore { session, delay_ms } => {
                    self.tasks.schedule_timer(session, delay_ms, EngineTask::RestorePanel);
                }
            }
        }
    }

    fn dependents(&self) -> [DependentOverlaySpec; 2] {
        [
            DependentOverlaySpec::new(OverlayId::CloseControl, self.config.close_control),
            DependentOverlaySpec::new(OverlayId::ProgressIndicator, self.config.progress_indicator),
        ]
    }

    fn flush_pending_restore<H: Host + ?Sized>(&mut self, host: &mut H) {
        if let Some(ended) = self.controller.pending_restore() {
            tracing::debug!("engine: flushing pending restore of {}", ended);
            self.tasks.release(ended);
            self.restore_panel(host, ended);
        }
    }

    fn restore_panel<H: Host + ?Sized>(&mut self, host: &mut H, session: SessionId) {
        let Some(offset) = self.controller.take_restore(session) else {
            return;
        };
        let clamped = host.panel_scroll().clamp(offset);
        tracing::debug!("engine: {} restoring panel offset {:.1}", session, clamped);
        host.set_panel_offset(clamped);
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Route a wheel or touch-derived scroll input and apply its effect
    pub fn handle_input<H: Host + ?Sized>(&mut self, host: &mut H, input: ScrollInput) -> RouteDecision {
        let scroll = host.panel_scroll();
        let decision = self.gateway.dispatch(
            &input,
            host.panel_rect(),
            scroll,
            self.controller.state().is_active(),
        );

        match decision.domain {
            ScrollDomain::Page if decision.consumed_default => host.scroll_page_to_top(),
            ScrollDomain::Panel => {
                if let Some(offset) = decision.resolve_panel_offset(scroll) {
                    host.set_panel_offset(offset);
                }
            }
            _ => {}
        }

        tracing::trace!(
            "engine: {:?} dy={:.1} -> {:?} (consumed: {})",
            input.axis,
            input.delta_y,
            decision.domain,
            decision.consumed_default
        );
        decision
    }

    pub fn touch_start(&mut self, point: Point) {
        self.gateway.touch_start(point);
    }

    /// Route a touch move; None when no touch is in progress
    ///
    /// The derived input is returned with the decision so the caller can
    /// apply native scrolling when the decision leaves the event alone.
    pub fn touch_move<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        point: Point,
    ) -> Option<(ScrollInput, RouteDecision)> {
        let input = self.gateway.touch_move(point)?;
        Some((input, self.handle_input(host, input)))
    }

    pub fn touch_end(&mut self) {
        self.gateway.touch_end();
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Modal content region scrolled; returns the new progress fraction
    pub fn modal_content_scrolled(
        &mut self,
        session: SessionId,
        scroll_top: f32,
        scroll_height: f32,
        client_height: f32,
    ) -> Option<f32> {
        if self.controller.session_id() != Some(session) {
            return None;
        }
        self.progress
            .update(session, scroll_top, scroll_height, client_height)
    }

    /// Deliver a resize, scroll, image-load, or mutation notification
    ///
    /// Only reaches the tracker when the live session holds a listener of
    /// that kind. Returns whether a new layout was published.
    pub fn notify<H: Host + ?Sized>(&mut self, host: &H, reason: Invalidation) -> bool {
        let Some(session) = self.controller.session_id() else {
            return false;
        };
        if let Some(kind) = reason.listener() {
            if self.tasks.listener_owner(kind) != Some(session) {
                return false;
            }
        }
        self.tracker.invalidate(session, reason, host)
    }

    /// Advance the clock by one frame
    ///
    /// Due timers fire first, then frame loops run. Returns whether the
    /// tracker published a new layout.
    pub fn frame<H: Host + ?Sized>(&mut self, host: &mut H, now_ms: u64) -> bool {
        self.now_ms = self.now_ms.max(now_ms);
        self.frame += 1;

        for (owner, task) in self.tasks.take_due_timers(self.now_ms) {
            if task == EngineTask::RestorePanel {
                self.restore_panel(host, owner);
            }
        }

        let live = self.controller.session_id();
        let mut published = false;
        for (owner, task) in self.tasks.frame_actions() {
            if live != Some(owner) {
                tracing::debug!("engine: releasing stale frame loop of {}", owner);
                self.tasks.release(owner);
                continue;
            }
            if task == EngineTask::Resample {
                published |= self.tracker.on_frame(owner, self.frame, &*host);
            }
        }
        published
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn modal_state(&self) -> ModalState {
        self.controller.state()
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.controller.session()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.controller.session_id()
    }

    /// Current dependent overlay rectangles
    pub fn overlay_layout(&self) -> Option<&OverlayLayout> {
        self.tracker.layout()
    }

    pub fn overlay_revision(&self) -> u64 {
        self.tracker.revision()
    }

    /// Reading progress of the modal content, in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.progress.fraction()
    }

    pub fn wheel_listener_attached(&self) -> bool {
        self.gateway.is_attached()
    }

    /// Panel offset saved for the live session or awaiting restore
    pub fn saved_offset(&self) -> Option<f32> {
        self.controller.saved_offset()
    }

    pub fn history(&self) -> &[(ModalState, u32, ModalState)] {
        self.controller.history()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &ProjectCatalog {
        &self.catalog
    }

    /// Registered timers, frame loops, and listeners
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

impl Default for ShowcaseEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
