//! Overlay position tracker
//!
//! While a modal session is alive, the anchor rectangle changes every frame
//! (spring-driven entrance and exit) and at discrete moments (image load,
//! resize, content mutation). The tracker resamples once per frame and, for
//! discrete invalidations, immediately. At most one out-of-band resample
//! runs per frame; further invalidations in the same frame are coalesced
//! into the next frame sample.
//!
//! Every entry point takes the caller's session id. Calls carrying any
//! other id are stale and ignored.

use smallvec::SmallVec;
use vitrine_core::scheduler::{ListenerKind, SessionId};

use crate::host::Host;
use crate::overlay::{DependentOverlaySpec, OverlayLayout};
use crate::sampler::{AnchorPolicy, PositionSampler};

/// Why an out-of-band resample was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Invalidation {
    /// First sample right after tracking starts
    Mount,
    Resize,
    Scroll,
    ImageLoad,
    Mutation,
}

impl Invalidation {
    /// Listener that delivers this notification, if any
    pub fn listener(&self) -> Option<ListenerKind> {
        match self {
            Invalidation::Mount => None,
            Invalidation::Resize => Some(ListenerKind::Resize),
            Invalidation::Scroll => Some(ListenerKind::Scroll),
            Invalidation::ImageLoad => Some(ListenerKind::ImageLoad),
            Invalidation::Mutation => Some(ListenerKind::Mutation),
        }
    }
}

struct Binding {
    session: SessionId,
    policy: AnchorPolicy,
    dependents: SmallVec<[DependentOverlaySpec; 2]>,
}

/// Keeps dependent overlays glued to a moving anchor
pub struct OverlayPositionTracker {
    sampler: PositionSampler,
    binding: Option<Binding>,
    layout: Option<OverlayLayout>,
    /// Bumped on every published change
    revision: u64,
    frame: u64,
    /// Frame in which the last out-of-band resample ran
    out_of_band_frame: Option<u64>,
    /// An invalidation was coalesced and waits for the next frame sample
    pending: bool,
    samples: u64,
}

impl OverlayPositionTracker {
    pub fn new() -> Self {
        Self {
            sampler: PositionSampler::new(),
            binding: None,
            layout: None,
            revision: 0,
            frame: 0,
            out_of_band_frame: None,
            pending: false,
            samples: 0,
        }
    }

    /// Begin tracking for a session, replacing any previous binding
    pub fn start(&mut self, session: SessionId, policy: AnchorPolicy, dependents: &[DependentOverlaySpec]) {
        if let Some(previous) = &self.binding {
            tracing::debug!("tracker: {} replaced by {}", previous.session, session);
        }
        self.binding = Some(Binding {
            session,
            policy,
            dependents: dependents.iter().copied().collect(),
        });
        self.layout = None;
        self.out_of_band_frame = None;
        self.pending = false;
        tracing::debug!("tracker: started for {}", session);
    }

    /// Stop tracking; nothing is published afterwards
    pub fn stop(&mut self) -> bool {
        let Some(binding) = self.binding.take() else {
            return false;
        };
        self.layout = None;
        self.pending = false;
        tracing::debug!(
            "tracker: stopped for {} after {} samples",
            binding.session,
            self.samples
        );
        true
    }

    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    pub fn session(&self) -> Option<SessionId> {
        self.binding.as_ref().map(|b| b.session)
    }

    /// Latest published layout, None while inactive or before the first sample
    pub fn layout(&self) -> Option<&OverlayLayout> {
        self.layout.as_ref()
    }

    /// Number of published changes so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of samples taken so far
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Whether an invalidation is waiting for the next frame
    pub fn has_pending(&self) -> bool {
        self.pending
    }

    /// Per-frame resample; returns whether a new layout was published
    pub fn on_frame<H: Host + ?Sized>(&mut self, session: SessionId, frame: u64, host: &H) -> bool {
        if self.session() != Some(session) {
            return false;
        }
        self.frame = frame;
        self.pending = false;
        self.resample(host)
    }

    /// Out-of-band resample request; returns whether a new layout was published
    pub fn invalidate<H: Host + ?Sized>(&mut self, session: SessionId, reason: Invalidation, host: &H) -> bool {
        if self.session() != Some(session) {
            tracing::trace!("tracker: dropped stale {:?} for {}", reason, session);
            return false;
        }
        if self.out_of_band_frame == Some(self.frame) {
            tracing::trace!("tracker: coalesced {:?} into next frame", reason);
            self.pending = true;
            return false;
        }
        self.out_of_band_frame = Some(self.frame);
        self.resample(host)
    }

    fn resample<H: Host + ?Sized>(&mut self, host: &H) -> bool {
        let Some(binding) = &self.binding else {
            return false;
        };
        self.samples += 1;

        let Some(sample) = self.sampler.sample(host, &binding.policy) else {
            tracing::trace!("tracker: anchor unavailable, keeping last layout");
            return false;
        };

        let next = OverlayLayout::compute(&sample, &binding.dependents);
        if matches!(&self.layout, Some(current) if current.same_placement(&next)) {
            return false;
        }

        tracing::trace!(
            "tracker: anchor {:?} at ({:.1}, {:.1}) {:.1}x{:.1}",
            sample.source,
            sample.rect.left,
            sample.rect.top,
            sample.rect.width,
            sample.rect.height
        );
        self.layout = Some(next);
        self.revision += 1;
        true
    }
}

impl Default for OverlayPositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProjectId;
    use crate::config::EngineConfig;
    use crate::host::ElementHandle;
    use crate::overlay::OverlayId;
    use crate::sampler::AnchorSource;
    use crate::scroll::ScrollPosition;
    use vitrine_core::geometry::{Rect, Size};

    const CONTAINER: ElementHandle = ElementHandle(10);
    const HERO: ElementHandle = ElementHandle(11);
    const S1: SessionId = SessionId::from_raw(1);
    const S2: SessionId = SessionId::from_raw(2);

    struct Doc {
        container: Option<Rect>,
        hero: Option<Rect>,
    }

    impl Host for Doc {
        fn viewport(&self) -> Size {
            Size::new(1280.0, 800.0)
        }
        fn element_rect(&self, element: ElementHandle) -> Option<Rect> {
            match element {
                CONTAINER => self.container,
                HERO => self.hero,
                _ => None,
            }
        }
        fn anchor_policy(&self, _project: &ProjectId) -> AnchorPolicy {
            policy()
        }
        fn panel_rect(&self) -> Rect {
            Rect::default()
        }
        fn panel_scroll(&self) -> ScrollPosition {
            ScrollPosition::default()
        }
        fn set_panel_offset(&mut self, _offset: f32) {}
        fn scroll_page_to_top(&mut self) {}
    }

    fn policy() -> AnchorPolicy {
        AnchorPolicy::container(CONTAINER).with_preferred(HERO)
    }

    fn dependents() -> Vec<DependentOverlaySpec> {
        let config = EngineConfig::default();
        vec![
            DependentOverlaySpec::new(OverlayId::CloseControl, config.close_control),
            DependentOverlaySpec::new(OverlayId::ProgressIndicator, config.progress_indicator),
        ]
    }

    fn doc() -> Doc {
        Doc {
            container: Some(Rect::new(100.0, 240.0, 800.0, 600.0)),
            hero: None,
        }
    }

    #[test]
    fn test_inactive_publishes_nothing() {
        let mut tracker = OverlayPositionTracker::new();
        assert!(!tracker.on_frame(S1, 1, &doc()));
        assert!(tracker.layout().is_none());
        assert_eq!(tracker.revision(), 0);
    }

    #[test]
    fn test_frame_sample_publishes_layout() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());

        assert!(tracker.on_frame(S1, 1, &doc()));
        let layout = tracker.layout().unwrap();
        assert_eq!(layout.anchor_source, AnchorSource::Container);
        let close = layout.get(OverlayId::CloseControl).unwrap();
        assert_eq!(close.top, 124.0);
        assert_eq!(close.right, 1280.0 - 1040.0 + 24.0);
    }

    #[test]
    fn test_unchanged_anchor_not_republished() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let d = doc();

        assert!(tracker.on_frame(S1, 1, &d));
        assert!(!tracker.on_frame(S1, 2, &d));
        assert_eq!(tracker.revision(), 1);
        assert_eq!(tracker.sample_count(), 2);
    }

    #[test]
    fn test_moving_anchor_tracked_every_frame() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let mut d = doc();

        for frame in 1..=10u64 {
            d.container = Some(Rect::new(100.0 - frame as f32 * 5.0, 240.0, 800.0, 600.0));
            assert!(tracker.on_frame(S1, frame, &d));
        }
        assert_eq!(tracker.revision(), 10);
        assert_eq!(tracker.layout().unwrap().anchor.top, 50.0);
    }

    #[test]
    fn test_image_load_switches_to_preferred_anchor() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let mut d = doc();
        tracker.on_frame(S1, 1, &d);

        d.hero = Some(Rect::new(140.0, 280.0, 720.0, 400.0));
        assert!(tracker.invalidate(S1, Invalidation::ImageLoad, &d));
        assert_eq!(tracker.layout().unwrap().anchor_source, AnchorSource::Preferred);
    }

    #[test]
    fn test_out_of_band_coalesced_per_frame() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let mut d = doc();
        tracker.on_frame(S1, 1, &d);

        d.container = Some(Rect::new(90.0, 240.0, 800.0, 600.0));
        assert!(tracker.invalidate(S1, Invalidation::Resize, &d));

        d.container = Some(Rect::new(80.0, 240.0, 800.0, 600.0));
        assert!(!tracker.invalidate(S1, Invalidation::Mutation, &d));
        assert!(tracker.has_pending());
        assert_eq!(tracker.layout().unwrap().anchor.top, 90.0);

        assert!(tracker.on_frame(S1, 2, &d));
        assert!(!tracker.has_pending());
        assert_eq!(tracker.layout().unwrap().anchor.top, 80.0);

        d.container = Some(Rect::new(70.0, 240.0, 800.0, 600.0));
        assert!(tracker.invalidate(S1, Invalidation::Scroll, &d));
    }

    #[test]
    fn test_stop_ends_publishing() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let mut d = doc();
        tracker.on_frame(S1, 1, &d);
        let revision = tracker.revision();

        assert!(tracker.stop());
        assert!(!tracker.stop());

        d.container = Some(Rect::new(0.0, 0.0, 400.0, 400.0));
        for frame in 2..20 {
            assert!(!tracker.on_frame(S1, frame, &d));
            assert!(!tracker.invalidate(S1, Invalidation::Resize, &d));
        }
        assert_eq!(tracker.revision(), revision);
        assert!(tracker.layout().is_none());
    }

    #[test]
    fn test_stale_session_ignored() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S2, policy(), &dependents());
        assert!(!tracker.on_frame(S1, 1, &doc()));
        assert!(!tracker.invalidate(S1, Invalidation::Resize, &doc()));
        assert_eq!(tracker.sample_count(), 0);
    }

    #[test]
    fn test_missing_anchor_keeps_last_layout() {
        let mut tracker = OverlayPositionTracker::new();
        tracker.start(S1, policy(), &dependents());
        let mut d = doc();
        tracker.on_frame(S1, 1, &d);

        d.container = None;
        assert!(!tracker.on_frame(S1, 2, &d));
        assert_eq!(tracker.layout().unwrap().anchor.top, 100.0);
    }
}
