//! Scenario definition for headless showcase runs.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use vitrine_engine::{CloseReason, ModalState, OverlayId};

/// Sequence of headless steps.
#[derive(Debug, Clone, Deserialize)]
pub struct HeadlessScenario {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<ScenarioStep>,
}

impl HeadlessScenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid scenario JSON")
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

fn default_close_reason() -> CloseReason {
    CloseReason::CloseControl
}

/// One scenario step: input, document change, or assertion.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    Wait {
        ms: u64,
    },
    Tick {
        frames: u32,
    },
    SetPanelOffset {
        offset: f32,
    },
    Wheel {
        #[serde(default)]
        delta_x: f32,
        delta_y: f32,
        x: f32,
        y: f32,
    },
    TouchStart {
        x: f32,
        y: f32,
    },
    TouchMove {
        x: f32,
        y: f32,
    },
    TouchEnd,
    Open {
        project: String,
    },
    Close {
        #[serde(default = "default_close_reason")]
        reason: CloseReason,
    },
    ScrollModal {
        fraction: f32,
    },
    Resize {
        width: f32,
        height: f32,
    },
    LoadImage,
    Mutate {
        height: f32,
    },
    AssertState {
        state: ModalState,
    },
    AssertPanelOffset {
        offset: f32,
    },
    AssertPageOffset {
        offset: f32,
    },
    AssertPageAtMost {
        offset: f32,
    },
    AssertProgress {
        value: f32,
    },
    AssertOverlay {
        id: OverlayId,
    },
    AssertSavedOffset {
        offset: Option<f32>,
    },
}

impl ScenarioStep {
    /// Assertion name used in reports, None for non-assertion steps
    pub fn assertion_name(&self) -> Option<&'static str> {
        match self {
            ScenarioStep::AssertState { .. } => Some("assert_state"),
            ScenarioStep::AssertPanelOffset { .. } => Some("assert_panel_offset"),
            ScenarioStep::AssertPageOffset { .. } => Some("assert_page_offset"),
            ScenarioStep::AssertPageAtMost { .. } => Some("assert_page_at_most"),
            ScenarioStep::AssertProgress { .. } => Some("assert_progress"),
            ScenarioStep::AssertOverlay { .. } => Some("assert_overlay"),
            ScenarioStep::AssertSavedOffset { .. } => Some("assert_saved_offset"),
            _ => None,
        }
    }
}
