//! Assertion helpers for headless scenarios.

use rustc_hash::FxHashMap;
use vitrine_engine::{DependentOverlayRect, ModalState, OverlayId, OverlayLayout};

/// Offsets compare equal within half a pixel.
pub const OFFSET_TOLERANCE: f32 = 0.5;
/// Progress fractions compare equal within one percent.
pub const PROGRESS_TOLERANCE: f32 = 0.01;

/// Snapshot of engine and stage state used for assertions.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    pub state: ModalState,
    pub panel_offset: f32,
    pub page_offset: f32,
    pub progress: f32,
    pub saved_offset: Option<f32>,
    /// Overlay rectangles as last published by the tracker
    pub overlays: FxHashMap<OverlayId, DependentOverlayRect>,
    pub published: Option<OverlayLayout>,
    /// Layout computed from a fresh anchor sample
    pub expected: Option<OverlayLayout>,
}

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_state(expected: ModalState, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if snapshot.state == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "state_mismatch",
            format!(
                "expected modal state '{}', got '{}'",
                expected.name(),
                snapshot.state.name()
            ),
        )
    }
}

/// Compare a measured value to its expectation within `tolerance`.
pub fn evaluate_assert_close(label: &str, expected: f32, actual: f32, tolerance: f32) -> AssertionResult {
    if (expected - actual).abs() <= tolerance {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "value_mismatch",
            format!("{label}: expected {expected:.2}, got {actual:.2}"),
        )
    }
}

pub fn evaluate_assert_at_most(label: &str, limit: f32, actual: f32) -> AssertionResult {
    if actual <= limit + OFFSET_TOLERANCE {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "value_too_large",
            format!("{label}: expected at most {limit:.2}, got {actual:.2}"),
        )
    }
}

/// The overlay is published and sits where a fresh anchor sample puts it.
pub fn evaluate_assert_overlay(id: OverlayId, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    if !snapshot.overlays.contains_key(&id) {
        return AssertionResult::failed(
            "missing_overlay",
            format!("{}: no rectangle published", id.name()),
        );
    }
    let (Some(published), Some(expected)) = (&snapshot.published, &snapshot.expected) else {
        return AssertionResult::failed("missing_anchor", format!("{}: anchor not mounted", id.name()));
    };
    if published.same_placement(expected) {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "overlay_detached",
            format!(
                "{}: published {:?} but anchor is at {:?}",
                id.name(),
                published.get(id),
                expected.get(id)
            ),
        )
    }
}

pub fn evaluate_assert_saved_offset(expected: Option<f32>, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    match (expected, snapshot.saved_offset) {
        (None, None) => AssertionResult::Passed,
        (Some(expected), Some(actual)) => {
            evaluate_assert_close("saved_offset", expected, actual, OFFSET_TOLERANCE)
        }
        (expected, actual) => AssertionResult::failed(
            "saved_offset_mismatch",
            format!("expected saved offset {expected:?}, got {actual:?}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_mismatch_message() {
        let snapshot = DiagnosticsSnapshot::default();
        assert_eq!(
            evaluate_assert_state(ModalState::Closed, &snapshot),
            AssertionResult::Passed
        );
        let AssertionResult::Failed { code, message } = evaluate_assert_state(ModalState::Open, &snapshot)
        else {
            panic!("expected failure");
        };
        assert_eq!(code, "state_mismatch");
        assert!(message.contains("'open'"));
    }

    #[test]
    fn test_close_within_tolerance() {
        assert_eq!(
            evaluate_assert_close("panel_offset", 300.0, 300.4, OFFSET_TOLERANCE),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_close("panel_offset", 300.0, 301.0, OFFSET_TOLERANCE),
            AssertionResult::Failed { .. }
        ));
    }

    #[test]
    fn test_at_most() {
        assert_eq!(evaluate_assert_at_most("page", 10.0, 3.0), AssertionResult::Passed);
        assert!(matches!(
            evaluate_assert_at_most("page", 10.0, 30.0),
            AssertionResult::Failed { .. }
        ));
    }

    #[test]
    fn test_missing_overlay() {
        let snapshot = DiagnosticsSnapshot::default();
        assert!(matches!(
            evaluate_assert_overlay(OverlayId::CloseControl, &snapshot),
            AssertionResult::Failed { code, .. } if code == "missing_overlay"
        ));
    }

    #[test]
    fn test_saved_offset() {
        let mut snapshot = DiagnosticsSnapshot::default();
        assert_eq!(evaluate_assert_saved_offset(None, &snapshot), AssertionResult::Passed);
        snapshot.saved_offset = Some(300.0);
        assert_eq!(
            evaluate_assert_saved_offset(Some(300.0), &snapshot),
            AssertionResult::Passed
        );
        assert!(matches!(
            evaluate_assert_saved_offset(None, &snapshot),
            AssertionResult::Failed { .. }
        ));
    }
}
