//! Panel scroll save/restore across a modal session

use vitrine_core::scheduler::SessionId;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedOffset {
    session: SessionId,
    offset: f32,
}

/// Holds the panel offset captured when a modal opened
#[derive(Debug, Clone, Default)]
pub struct ScrollStatePreserver {
    saved: Option<SavedOffset>,
}

impl ScrollStatePreserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the panel offset for a session
    ///
    /// Only the first capture per session is kept. A capture for a new
    /// session replaces whatever an older session left behind.
    pub fn capture(&mut self, session: SessionId, offset: f32) -> bool {
        if matches!(self.saved, Some(saved) if saved.session == session) {
            tracing::debug!("{} already captured its panel offset", session);
            return false;
        }
        self.saved = Some(SavedOffset { session, offset });
        true
    }

    /// Take the offset to restore for a session
    ///
    /// None when nothing was captured for this session, when it was already
    /// restored, or when the captured offset is zero.
    pub fn restore(&mut self, session: SessionId) -> Option<f32> {
        match self.saved {
            Some(saved) if saved.session == session => {
                self.saved = None;
                (saved.offset != 0.0).then_some(saved.offset)
            }
            _ => None,
        }
    }

    /// Captured offset for a session, without consuming it
    pub fn saved_offset(&self, session: SessionId) -> Option<f32> {
        self.saved
            .filter(|saved| saved.session == session)
            .map(|saved| saved.offset)
    }

    /// Session whose offset is still waiting to be restored
    pub fn pending_session(&self) -> Option<SessionId> {
        self.saved.map(|saved| saved.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: SessionId = SessionId::from_raw(1);
    const S2: SessionId = SessionId::from_raw(2);

    #[test]
    fn test_capture_then_restore_once() {
        let mut preserver = ScrollStatePreserver::new();
        assert!(preserver.capture(S1, 300.0));
        assert_eq!(preserver.saved_offset(S1), Some(300.0));
        assert_eq!(preserver.restore(S1), Some(300.0));
        assert_eq!(preserver.restore(S1), None);
    }

    #[test]
    fn test_restore_without_capture_is_noop() {
        let mut preserver = ScrollStatePreserver::new();
        assert_eq!(preserver.restore(S1), None);
    }

    #[test]
    fn test_zero_offset_skips_restore() {
        let mut preserver = ScrollStatePreserver::new();
        preserver.capture(S1, 0.0);
        assert_eq!(preserver.restore(S1), None);
        assert_eq!(preserver.pending_session(), None);
    }

    #[test]
    fn test_second_capture_ignored() {
        let mut preserver = ScrollStatePreserver::new();
        assert!(preserver.capture(S1, 300.0));
        assert!(!preserver.capture(S1, 0.0));
        assert_eq!(preserver.restore(S1), Some(300.0));
    }

    #[test]
    fn test_stale_session_cannot_restore() {
        let mut preserver = ScrollStatePreserver::new();
        preserver.capture(S1, 120.0);
        preserver.capture(S2, 480.0);

        assert_eq!(preserver.restore(S1), None);
        assert_eq!(preserver.restore(S2), Some(480.0));
    }
}
