//! Headless runtime: the engine driving a simulated stage on a fixed clock.

use anyhow::{bail, Context, Result};
use rustc_hash::FxHashMap;
use vitrine_core::events::ScrollInput;
use vitrine_core::geometry::Point;
use vitrine_core::scheduler::SessionId;
use vitrine_engine::{
    CloseReason, DependentOverlaySpec, EngineConfig, Host, Invalidation, OverlayId, OverlayLayout,
    PositionSampler, RouteDecision, ScrollDomain, ShowcaseEngine,
};

use crate::headless_assert::DiagnosticsSnapshot;
use crate::stage::{HeadlessStage, StageConfig, StageSignal};

/// Configuration for deterministic headless frame execution.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
    /// Upper bound on frames a single run may execute.
    pub max_frames: u64,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16,
            max_frames: 60_000,
        }
    }
}

/// Engine plus stage, advanced one frame at a time.
pub struct HeadlessRuntime {
    cfg: HeadlessRunConfig,
    engine: ShowcaseEngine,
    stage: HeadlessStage,
    elapsed_frames: u64,
    elapsed_ms: u64,
}

impl HeadlessRuntime {
    pub fn new(cfg: HeadlessRunConfig, engine: EngineConfig, stage: StageConfig) -> Result<Self> {
        if cfg.tick_ms == 0 {
            bail!("headless tick_ms must be > 0");
        }
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }
        Ok(Self {
            cfg,
            engine: ShowcaseEngine::new(engine).context("invalid engine configuration")?,
            stage: HeadlessStage::new(stage).context("invalid stage configuration")?,
            elapsed_frames: 0,
            elapsed_ms: 0,
        })
    }

    pub fn engine(&self) -> &ShowcaseEngine {
        &self.engine
    }

    pub fn stage(&self) -> &HeadlessStage {
        &self.stage
    }

    pub fn config(&self) -> &HeadlessRunConfig {
        &self.cfg
    }

    pub fn elapsed_frames(&self) -> u64 {
        self.elapsed_frames
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Run `frames` full frames.
    pub fn tick(&mut self, frames: u32) -> Result<()> {
        for _ in 0..frames {
            self.step_frame(self.cfg.tick_ms)?;
        }
        Ok(())
    }

    /// Let `ms` of logical time pass; the last frame may be shorter.
    pub fn wait(&mut self, ms: u64) -> Result<()> {
        let mut remaining = ms;
        while remaining > 0 {
            let step = remaining.min(self.cfg.tick_ms);
            remaining -= step;
            self.step_frame(step)?;
        }
        Ok(())
    }

    fn step_frame(&mut self, advance_ms: u64) -> Result<()> {
        if self.elapsed_frames >= self.cfg.max_frames {
            bail!("headless run exceeded {} frames", self.cfg.max_frames);
        }
        self.elapsed_frames += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(advance_ms);

        if let Some(signal) = self.stage.advance(advance_ms as f32 / 1000.0) {
            match signal {
                StageSignal::EntranceSettled(session) => {
                    self.engine.entrance_settled(session);
                }
                StageSignal::ExitSettled(session) => {
                    self.engine.exit_settled(session);
                }
            }
        }
        self.engine.frame(&mut self.stage, self.elapsed_ms);
        Ok(())
    }

    // =========================================================================
    // User actions
    // =========================================================================

    /// Click a gallery card; None when the engine ignored the request
    pub fn open(&mut self, project: &str) -> Option<SessionId> {
        match self.engine.open_modal(&mut self.stage, project) {
            Ok(session) => {
                let card = self.engine.catalog().index_of(project).unwrap_or(0);
                self.stage.present_modal(session, card);
                self.engine.notify(&self.stage, Invalidation::Mount);
                Some(session)
            }
            Err(rejected) => {
                tracing::debug!("open ignored: {}", rejected);
                None
            }
        }
    }

    pub fn close(&mut self, reason: CloseReason) -> bool {
        if !self.engine.close_modal(reason) {
            return false;
        }
        self.stage.dismiss_modal()
    }

    pub fn wheel(&mut self, delta_x: f32, delta_y: f32, x: f32, y: f32) -> RouteDecision {
        let input = ScrollInput::wheel(delta_x, delta_y, Point::new(x, y));
        let decision = self.engine.handle_input(&mut self.stage, input);
        self.apply_native(&input, &decision);
        decision
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.engine.touch_start(Point::new(x, y));
    }

    /// None when no touch is in progress
    pub fn touch_move(&mut self, x: f32, y: f32) -> Option<RouteDecision> {
        let (input, decision) = self.engine.touch_move(&mut self.stage, Point::new(x, y))?;
        self.apply_native(&input, &decision);
        Some(decision)
    }

    pub fn touch_end(&mut self) {
        self.engine.touch_end();
    }

    /// Default scroll handling the document performs when the engine leaves
    /// the event alone.
    fn apply_native(&mut self, input: &ScrollInput, decision: &RouteDecision) {
        if decision.consumed_default {
            return;
        }
        match decision.domain {
            ScrollDomain::Panel => self.stage.scroll_panel_by(input.delta_y),
            ScrollDomain::None if self.stage.modal_contains(input.pointer) => {
                if let Some(metrics) = self.stage.scroll_modal_by(input.delta_y) {
                    self.modal_scrolled(metrics);
                }
            }
            _ => {}
        }
    }

    pub fn scroll_modal(&mut self, fraction: f32) -> Option<f32> {
        let metrics = self.stage.scroll_modal_to(fraction)?;
        self.modal_scrolled(metrics)
    }

    fn modal_scrolled(&mut self, (session, top, height, client): (SessionId, f32, f32, f32)) -> Option<f32> {
        self.engine.notify(&self.stage, Invalidation::Scroll);
        self.engine.modal_content_scrolled(session, top, height, client)
    }

    pub fn set_panel_offset(&mut self, offset: f32) {
        self.stage.scroll_panel_to(offset);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.stage.resize(width, height);
        self.engine.notify(&self.stage, Invalidation::Resize);
    }

    pub fn load_image(&mut self) -> bool {
        if !self.stage.load_hero() {
            return false;
        }
        self.engine.notify(&self.stage, Invalidation::ImageLoad);
        true
    }

    pub fn mutate(&mut self, height: f32) -> bool {
        if !self.stage.set_modal_content_height(height) {
            return false;
        }
        self.engine.notify(&self.stage, Invalidation::Mutation);
        true
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Capture everything the assertions look at
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let published = self.engine.overlay_layout().cloned();
        let overlays: FxHashMap<_, _> = published
            .iter()
            .flat_map(|layout| layout.overlays.iter().copied())
            .collect();

        let expected = self.engine.session().and_then(|session| {
            let sample = PositionSampler::new().sample(&self.stage, &session.anchor)?;
            let config = self.engine.config();
            let specs = [
                DependentOverlaySpec::new(OverlayId::CloseControl, config.close_control),
                DependentOverlaySpec::new(OverlayId::ProgressIndicator, config.progress_indicator),
            ];
            Some(OverlayLayout::compute(&sample, &specs))
        });

        DiagnosticsSnapshot {
            state: self.engine.modal_state(),
            panel_offset: self.stage.panel_scroll().offset,
            page_offset: self.stage.page_offset(),
            progress: self.engine.progress(),
            saved_offset: self.engine.saved_offset(),
            overlays,
            published,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_engine::ModalState;

    fn runtime() -> HeadlessRuntime {
        HeadlessRuntime::new(
            HeadlessRunConfig::default(),
            EngineConfig::default(),
            StageConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_tick_rejected() {
        let cfg = HeadlessRunConfig {
            tick_ms: 0,
            ..Default::default()
        };
        assert!(HeadlessRuntime::new(cfg, EngineConfig::default(), StageConfig::default()).is_err());
    }

    #[test]
    fn test_frame_budget_enforced() {
        let cfg = HeadlessRunConfig {
            max_frames: 3,
            ..Default::default()
        };
        let mut runtime = HeadlessRuntime::new(cfg, EngineConfig::default(), StageConfig::default()).unwrap();
        assert!(runtime.tick(3).is_ok());
        assert!(runtime.tick(1).is_err());
    }

    #[test]
    fn test_wait_rounds_last_frame() {
        let mut runtime = runtime();
        runtime.wait(40).unwrap();
        assert_eq!(runtime.elapsed_frames(), 3);
        assert_eq!(runtime.elapsed_ms(), 40);
    }

    #[test]
    fn test_modal_opens_and_settles() {
        let mut runtime = runtime();
        let session = runtime.open("x-heal").unwrap();
        assert_eq!(runtime.engine().modal_state(), ModalState::Opening);
        assert_eq!(runtime.stage().modal_session(), Some(session));

        runtime.tick(120).unwrap();
        assert_eq!(runtime.engine().modal_state(), ModalState::Open);

        let snapshot = runtime.snapshot();
        assert!(snapshot.overlays.contains_key(&OverlayId::CloseControl));
        assert!(snapshot.published.unwrap().same_placement(&snapshot.expected.unwrap()));
    }

    #[test]
    fn test_open_publishes_layout_for_mounted_card() {
        let mut runtime = runtime();
        runtime.open("prelo").unwrap();

        let snapshot = runtime.snapshot();
        let published = snapshot.published.unwrap();
        assert!(published.same_placement(&snapshot.expected.unwrap()));
        assert_eq!(runtime.engine().overlay_revision(), 1);
    }

    #[test]
    fn test_rejected_open_leaves_stage_alone() {
        let mut runtime = runtime();
        assert_eq!(runtime.open("unknown"), None);
        assert!(!runtime.stage().is_modal_mounted());
    }

    #[test]
    fn test_native_modal_scroll_updates_progress() {
        let mut runtime = runtime();
        runtime.open("prelo").unwrap();
        runtime.tick(120).unwrap();

        let decision = runtime.wheel(0.0, 848.0, 640.0, 400.0);
        assert_eq!(decision.domain, ScrollDomain::None);
        assert!((runtime.engine().progress() - 0.5).abs() < 1e-4);
        assert_eq!(runtime.stage().panel_offset(), 0.0);
    }

    #[test]
    fn test_touch_drag_scrolls_panel_natively() {
        let mut runtime = runtime();
        runtime.set_panel_offset(100.0);

        runtime.touch_start(900.0, 500.0);
        let decision = runtime.touch_move(900.0, 440.0).unwrap();
        runtime.touch_end();

        assert_eq!(decision.domain, ScrollDomain::Panel);
        assert!(!decision.consumed_default);
        assert_eq!(runtime.stage().panel_offset(), 160.0);
    }

    #[test]
    fn test_touch_drag_over_modal_updates_progress() {
        let mut runtime = runtime();
        runtime.set_panel_offset(100.0);
        runtime.open("prelo").unwrap();
        runtime.tick(120).unwrap();

        runtime.touch_start(640.0, 700.0);
        let decision = runtime.touch_move(640.0, 276.0).unwrap();
        assert_eq!(decision.domain, ScrollDomain::None);
        runtime.touch_move(640.0, 700.0);
        runtime.touch_start(640.0, 700.0);
        runtime.touch_move(640.0, 276.0);
        runtime.touch_end();

        // 424 up, 424 back, 424 up again
        assert!((runtime.engine().progress() - 0.25).abs() < 1e-4);
        assert_eq!(runtime.stage().panel_offset(), 100.0);
    }

    #[test]
    fn test_restore_waits_delay_after_exit() {
        let mut runtime = runtime();
        runtime.set_panel_offset(300.0);
        let session = runtime.open("x-heal").unwrap();
        runtime.tick(120).unwrap();
        runtime.close(CloseReason::Backdrop);

        let mut closed_at = None;
        for _ in 0..200 {
            runtime.tick(1).unwrap();
            if closed_at.is_none() && runtime.engine().modal_state() == ModalState::Closed {
                assert_eq!(runtime.stage().panel_offset(), 0.0);
                closed_at = Some(runtime.elapsed_ms());
            }
            if runtime.stage().panel_offset() == 300.0 {
                break;
            }
        }

        let closed_at = closed_at.unwrap();
        assert_eq!(runtime.stage().panel_offset(), 300.0);
        assert!(runtime.elapsed_ms() >= closed_at + 100);
        assert_ne!(runtime.engine().session_id(), Some(session));
    }
}
