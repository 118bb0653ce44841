//! Modal reading progress

use vitrine_core::scheduler::SessionId;

/// Scroll fraction of a content region, in `[0, 1]`
///
/// Zero when the content does not overflow.
pub fn compute(scroll_top: f32, scroll_height: f32, client_height: f32) -> f32 {
    let range = scroll_height - client_height;
    if range > 0.0 {
        (scroll_top / range).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Progress of the active session's modal content
#[derive(Debug, Clone, Default)]
pub struct ProgressComputation {
    session: Option<SessionId>,
    fraction: f32,
}

impl ProgressComputation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new session at zero progress
    pub fn reset(&mut self, session: SessionId) {
        self.session = Some(session);
        self.fraction = 0.0;
    }

    /// Stop tracking
    pub fn clear(&mut self) {
        self.session = None;
        self.fraction = 0.0;
    }

    /// Recompute on a content scroll event; stale sessions are ignored
    pub fn update(
        &mut self,
        session: SessionId,
        scroll_top: f32,
        scroll_height: f32,
        client_height: f32,
    ) -> Option<f32> {
        if self.session != Some(session) {
            return None;
        }
        self.fraction = compute(scroll_top, scroll_height, client_height);
        Some(self.fraction)
    }

    pub fn fraction(&self) -> f32 {
        self.fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_midpoint() {
        assert_eq!(compute(500.0, 1800.0, 800.0), 0.5);
    }

    #[test]
    fn test_compute_no_overflow_is_zero() {
        assert_eq!(compute(0.0, 600.0, 800.0), 0.0);
        assert_eq!(compute(100.0, 800.0, 800.0), 0.0);
    }

    #[test]
    fn test_compute_clamps() {
        assert_eq!(compute(-40.0, 1800.0, 800.0), 0.0);
        assert_eq!(compute(5000.0, 1800.0, 800.0), 1.0);
    }

    #[test]
    fn test_compute_monotonic() {
        let mut last = 0.0;
        for step in 0..=300 {
            let top = step as f32 * 5.0 - 100.0;
            let fraction = compute(top, 2000.0, 700.0);
            assert!(fraction >= last, "fraction dropped at scroll_top={top}");
            assert!((0.0..=1.0).contains(&fraction));
            last = fraction;
        }
    }

    #[test]
    fn test_stale_session_ignored() {
        let s1 = SessionId::from_raw(1);
        let s2 = SessionId::from_raw(2);
        let mut progress = ProgressComputation::new();
        progress.reset(s2);

        assert_eq!(progress.update(s1, 500.0, 1800.0, 800.0), None);
        assert_eq!(progress.fraction(), 0.0);
        assert_eq!(progress.update(s2, 250.0, 1800.0, 800.0), Some(0.25));
    }
}
