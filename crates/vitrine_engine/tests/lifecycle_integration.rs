//! End-to-end engine behaviour against an in-memory document

use vitrine_core::event_types::{CLOSE_REQUEST, ENTRANCE_COMPLETE, EXIT_COMPLETE, OPEN_REQUEST};
use vitrine_core::geometry::{Point, Rect, Size};
use vitrine_core::ScrollInput;
use vitrine_engine::progress::compute;
use vitrine_engine::{
    AnchorPolicy, CloseReason, ElementHandle, Host, Invalidation, ModalState, OpenRejected, OverlayId,
    ProjectId, ScrollDomain, ScrollPosition, ShowcaseEngine,
};

const CONTAINER: ElementHandle = ElementHandle(10);
const HERO: ElementHandle = ElementHandle(11);
const FRAME_MS: u64 = 16;

/// Page with a hero section and a right-hand project panel
struct Document {
    page_offset: f32,
    panel_offset: f32,
    panel_max: f32,
    modal: Option<Rect>,
    hero: Option<Rect>,
    /// Unmounting the modal drops the panel offset, as a re-render would
    reset_panel_on_unmount: bool,
}

impl Document {
    fn new(panel_offset: f32) -> Self {
        Self {
            page_offset: 600.0,
            panel_offset,
            panel_max: 2400.0,
            modal: None,
            hero: None,
            reset_panel_on_unmount: true,
        }
    }

    fn mount_modal(&mut self) {
        self.modal = Some(Rect::new(80.0, 240.0, 800.0, 640.0));
    }

    fn unmount_modal(&mut self) {
        self.modal = None;
        self.hero = None;
        if self.reset_panel_on_unmount {
            self.panel_offset = 0.0;
        }
    }
}

impl Host for Document {
    fn viewport(&self) -> Size {
        Size::new(1280.0, 800.0)
    }

    fn element_rect(&self, element: ElementHandle) -> Option<Rect> {
        match element {
            CONTAINER => self.modal,
            HERO => self.hero,
            _ => None,
        }
    }

    fn anchor_policy(&self, _project: &ProjectId) -> AnchorPolicy {
        AnchorPolicy::container(CONTAINER).with_preferred(HERO)
    }

    fn panel_rect(&self) -> Rect {
        Rect::new(0.0, 640.0, 640.0, 800.0)
    }

    fn panel_scroll(&self) -> ScrollPosition {
        ScrollPosition::new(self.panel_offset, self.panel_max)
    }

    fn set_panel_offset(&mut self, offset: f32) {
        self.panel_offset = offset;
    }

    fn scroll_page_to_top(&mut self) {
        self.page_offset = 0.0;
    }
}

struct Harness {
    engine: ShowcaseEngine,
    doc: Document,
    now_ms: u64,
}

impl Harness {
    fn new(panel_offset: f32) -> Self {
        Self {
            engine: ShowcaseEngine::default(),
            doc: Document::new(panel_offset),
            now_ms: 0,
        }
    }

    fn tick(&mut self, frames: u32) {
        for _ in 0..frames {
            self.now_ms += FRAME_MS;
            self.engine.frame(&mut self.doc, self.now_ms);
        }
    }

    fn wheel(&mut self, delta_y: f32, pointer: Point) -> vitrine_engine::RouteDecision {
        self.engine
            .handle_input(&mut self.doc, ScrollInput::wheel(0.0, delta_y, pointer))
    }
}

fn outside_panel() -> Point {
    Point::new(200.0, 300.0)
}

#[test]
fn test_wheel_outside_panel_redirects_with_multiplier() {
    for (start, delta) in [(100.0f32, 40.0f32), (100.0, -30.0), (2300.0, 120.0), (5.0, -50.0)] {
        let mut h = Harness::new(start);
        let decision = h.wheel(delta, outside_panel());
        assert_eq!(decision.domain, ScrollDomain::Panel);
        assert!(decision.consumed_default);
        assert_eq!(h.doc.panel_offset, (start + delta * 2.5).clamp(0.0, 2400.0));
        assert_eq!(h.doc.page_offset, 600.0);
    }
}

#[test]
fn test_wheel_while_modal_active_changes_nothing() {
    let mut h = Harness::new(300.0);
    h.doc.mount_modal();
    let session = h.engine.open_modal(&mut h.doc, "x-heal").unwrap();

    for state_step in 0..2 {
        let decision = h.wheel(60.0, outside_panel());
        assert_eq!(decision.domain, ScrollDomain::None);
        assert!(!decision.consumed_default);
        let decision = h.wheel(-60.0, Point::new(900.0, 300.0));
        assert_eq!(decision.domain, ScrollDomain::None);
        assert_eq!(h.doc.panel_offset, 300.0);
        assert_eq!(h.doc.page_offset, 600.0);

        if state_step == 0 {
            h.tick(1);
            h.engine.entrance_settled(session);
            assert_eq!(h.engine.modal_state(), ModalState::Open);
        }
    }
}

#[test]
fn test_open_close_restores_exact_offset() {
    for offset in [0.0f32, 1.0, 300.0, 1234.5] {
        let mut h = Harness::new(offset);
        h.doc.mount_modal();
        let session = h.engine.open_modal(&mut h.doc, "prelo").unwrap();
        h.tick(20);
        h.engine.entrance_settled(session);
        h.engine.close_modal(CloseReason::CloseControl);
        h.tick(20);
        h.doc.unmount_modal();
        h.engine.exit_settled(session);
        h.tick(10);

        assert_eq!(h.doc.panel_offset, offset);
        assert_eq!(h.engine.pending_tasks(), 0);
    }
}

#[test]
fn test_progress_is_monotonic() {
    let mut last = 0.0;
    for top in (0..=2000).step_by(25) {
        let fraction = compute(top as f32, 1600.0, 600.0);
        assert!(fraction >= last);
        last = fraction;
    }
    assert_eq!(last, 1.0);
    assert_eq!(compute(300.0, 500.0, 600.0), 0.0);
    assert_eq!(compute(300.0, 600.0, 600.0), 0.0);
}

#[test]
fn test_no_layout_published_after_close() {
    let mut h = Harness::new(0.0);
    h.doc.mount_modal();
    let session = h.engine.open_modal(&mut h.doc, "x-heal").unwrap();
    h.tick(2);
    assert!(h.engine.overlay_layout().is_some());

    h.engine.close_modal(CloseReason::Backdrop);
    h.engine.exit_settled(session);
    let revision = h.engine.overlay_revision();

    // The document keeps changing after the session ends
    h.doc.modal = Some(Rect::new(10.0, 10.0, 300.0, 300.0));
    h.doc.hero = Some(Rect::new(20.0, 20.0, 200.0, 100.0));
    h.tick(5);
    assert!(!h.engine.notify(&h.doc, Invalidation::Resize));
    assert!(!h.engine.notify(&h.doc, Invalidation::ImageLoad));

    assert_eq!(h.engine.overlay_revision(), revision);
    assert!(h.engine.overlay_layout().is_none());
}

#[test]
fn test_x_heal_walkthrough() {
    let mut h = Harness::new(300.0);
    assert!(h.engine.session().is_none());

    h.doc.mount_modal();
    let session = h.engine.open_modal(&mut h.doc, "x-heal").unwrap();
    assert_eq!(h.engine.modal_state(), ModalState::Opening);
    assert_eq!(h.engine.session().unwrap().saved_panel_offset, 300.0);
    assert!(!h.engine.wheel_listener_attached());
    assert!(h.engine.overlay_layout().is_none());
    assert!(h.engine.notify(&h.doc, Invalidation::Mount));
    assert!(h.engine.overlay_layout().is_some());

    h.tick(10);
    assert!(h.engine.entrance_settled(session));
    assert_eq!(h.engine.modal_state(), ModalState::Open);

    // Overlays follow the hero once it loads
    h.doc.hero = Some(Rect::new(80.0, 240.0, 800.0, 420.0));
    assert!(h.engine.notify(&h.doc, Invalidation::ImageLoad));
    let layout = h.engine.overlay_layout().unwrap();
    let progress_bar = layout.get(OverlayId::ProgressIndicator).unwrap();
    assert_eq!(progress_bar.top, 104.0);
    assert_eq!(progress_bar.right, 252.0);
    assert_eq!(progress_bar.height, 372.0);

    assert_eq!(h.engine.modal_content_scrolled(session, 600.0, 1800.0, 600.0), Some(0.5));
    assert_eq!(h.engine.progress(), 0.5);

    assert!(h.engine.close_modal(CloseReason::Cancel));
    assert_eq!(h.engine.modal_state(), ModalState::Closing);
    assert_eq!(h.doc.panel_offset, 300.0);

    h.tick(10);
    h.doc.unmount_modal();
    assert_eq!(h.doc.panel_offset, 0.0);
    assert!(h.engine.exit_settled(session));
    assert_eq!(h.engine.modal_state(), ModalState::Closed);
    assert!(h.engine.wheel_listener_attached());

    // Armed by the first frame, fires 100 ms later
    h.tick(7);
    assert_eq!(h.doc.panel_offset, 0.0);
    h.tick(1);

    let transitions: Vec<_> = h
        .engine
        .history()
        .iter()
        .map(|(from, event, to)| (*from, *event, *to))
        .collect();
    assert_eq!(
        transitions,
        vec![
            (ModalState::Closed, OPEN_REQUEST, ModalState::Opening),
            (ModalState::Opening, ENTRANCE_COMPLETE, ModalState::Open),
            (ModalState::Open, CLOSE_REQUEST, ModalState::Closing),
            (ModalState::Closing, EXIT_COMPLETE, ModalState::Closed),
        ]
    );
    assert_eq!(h.doc.panel_offset, 300.0);
}

#[test]
fn test_scroll_up_at_panel_top_reveals_hero() {
    let mut h = Harness::new(0.0);
    let decision = h.wheel(-20.0, outside_panel());
    assert_eq!(decision.domain, ScrollDomain::Page);
    assert!(decision.consumed_default);
    assert_eq!(h.doc.page_offset, 0.0);
    assert_eq!(h.doc.panel_offset, 0.0);
}

#[test]
fn test_second_open_ignored_while_active() {
    let mut h = Harness::new(300.0);
    h.doc.mount_modal();
    let session = h.engine.open_modal(&mut h.doc, "x-heal").unwrap();

    h.doc.panel_offset = 50.0;
    assert_eq!(
        h.engine.open_modal(&mut h.doc, "x-heal"),
        Err(OpenRejected::AlreadyOpen(ProjectId::from("x-heal")))
    );
    assert!(matches!(
        h.engine.open_modal(&mut h.doc, "prelo"),
        Err(OpenRejected::SessionActive { .. })
    ));
    assert_eq!(h.engine.session_id(), Some(session));
    assert_eq!(h.engine.saved_offset(), Some(300.0));
}

#[test]
fn test_stale_exit_signal_after_reopen() {
    let mut h = Harness::new(120.0);
    h.doc.mount_modal();
    let first = h.engine.open_modal(&mut h.doc, "x-heal").unwrap();
    h.engine.close_modal(CloseReason::Backdrop);
    h.engine.exit_settled(first);

    let second = h.engine.open_modal(&mut h.doc, "mushroommate").unwrap();
    assert!(!h.engine.exit_settled(first));
    assert!(!h.engine.entrance_settled(first));
    assert_eq!(h.engine.modal_state(), ModalState::Opening);
    assert_eq!(h.engine.session_id(), Some(second));
}

#[test]
fn test_restore_delay_counts_from_exit() {
    let mut h = Harness::new(300.0);
    h.doc.mount_modal();
    let session = h.engine.open_modal(&mut h.doc, "prelo").unwrap();
    h.tick(3);
    h.engine.entrance_settled(session);
    h.engine.close_modal(CloseReason::Backdrop);

    // The exit settles without any frame for a long while
    h.now_ms += 4000;
    h.doc.unmount_modal();
    h.engine.exit_settled(session);
    let exited_at = h.now_ms;

    while h.doc.panel_offset == 0.0 {
        assert!(h.now_ms < exited_at + 1000, "restore never fired");
        h.tick(1);
    }
    assert!(h.now_ms >= exited_at + 100);
    assert_eq!(h.doc.panel_offset, 300.0);
}
