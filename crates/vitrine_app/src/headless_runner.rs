//! Scenario runner that executes headless showcase scenarios.

use anyhow::Result;
use vitrine_engine::EngineConfig;

use crate::headless_assert::{
    evaluate_assert_at_most, evaluate_assert_close, evaluate_assert_overlay, evaluate_assert_saved_offset,
    evaluate_assert_state, AssertionResult, DiagnosticsSnapshot, OFFSET_TOLERANCE, PROGRESS_TOLERANCE,
};
use crate::headless_report::HeadlessReport;
use crate::headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
use crate::headless_scenario::{HeadlessScenario, ScenarioStep};
use crate::stage::StageConfig;

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: HeadlessReport },
    Failed { report: HeadlessReport },
}

impl RunOutcome {
    pub fn report(&self) -> &HeadlessReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn into_report(self) -> HeadlessReport {
        match self {
            RunOutcome::Passed { report } | RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Everything a run needs besides the scenario itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSettings {
    pub runtime: HeadlessRunConfig,
    pub engine: EngineConfig,
    pub stage: StageConfig,
}

/// Execute scenario JSON with default settings.
pub fn run_scenario(input: &str) -> Result<RunOutcome> {
    run_scenario_with(input, RunSettings::default())
}

/// Execute scenario JSON with explicit settings.
pub fn run_scenario_with(input: &str, settings: RunSettings) -> Result<RunOutcome> {
    let scenario = HeadlessScenario::from_json(input)?;
    run_loaded_scenario(&scenario, settings)
}

/// Execute a pre-loaded scenario.
pub fn run_loaded_scenario(scenario: &HeadlessScenario, settings: RunSettings) -> Result<RunOutcome> {
    let mut runtime = HeadlessRuntime::new(settings.runtime, settings.engine, settings.stage)?;
    tracing::debug!(
        "running scenario {} ({} steps)",
        scenario.name.as_deref().unwrap_or("<unnamed>"),
        scenario.steps.len()
    );

    for (step_index, step) in scenario.steps.iter().enumerate() {
        if let Some(assertion) = step.assertion_name() {
            let snapshot = runtime.snapshot();
            if let AssertionResult::Failed { message, .. } = evaluate(step, &snapshot) {
                tracing::debug!("step {} failed {}: {}", step_index, assertion, message);
                let report = HeadlessReport::failed(
                    assertion,
                    step_index,
                    message,
                    runtime.elapsed_frames(),
                    runtime.elapsed_ms(),
                    snapshot.state,
                )
                .with_scenario(scenario.name.clone());
                return Ok(RunOutcome::Failed { report });
            }
            continue;
        }
        perform(&mut runtime, step)?;
    }

    let report = HeadlessReport::passed(
        runtime.elapsed_frames(),
        runtime.elapsed_ms(),
        runtime.engine().modal_state(),
    )
    .with_scenario(scenario.name.clone());
    Ok(RunOutcome::Passed { report })
}

fn perform(runtime: &mut HeadlessRuntime, step: &ScenarioStep) -> Result<()> {
    match step {
        ScenarioStep::Wait { ms } => runtime.wait(*ms)?,
        ScenarioStep::Tick { frames } => runtime.tick(*frames)?,
        ScenarioStep::SetPanelOffset { offset } => runtime.set_panel_offset(*offset),
        ScenarioStep::Wheel {
            delta_x,
            delta_y,
            x,
            y,
        } => {
            runtime.wheel(*delta_x, *delta_y, *x, *y);
        }
        ScenarioStep::TouchStart { x, y } => runtime.touch_start(*x, *y),
        ScenarioStep::TouchMove { x, y } => {
            runtime.touch_move(*x, *y);
        }
        ScenarioStep::TouchEnd => runtime.touch_end(),
        ScenarioStep::Open { project } => {
            runtime.open(project);
        }
        ScenarioStep::Close { reason } => {
            runtime.close(*reason);
        }
        ScenarioStep::ScrollModal { fraction } => {
            runtime.scroll_modal(*fraction);
        }
        ScenarioStep::Resize { width, height } => runtime.resize(*width, *height),
        ScenarioStep::LoadImage => {
            runtime.load_image();
        }
        ScenarioStep::Mutate { height } => {
            runtime.mutate(*height);
        }
        ScenarioStep::AssertState { .. }
        | ScenarioStep::AssertPanelOffset { .. }
        | ScenarioStep::AssertPageOffset { .. }
        | ScenarioStep::AssertPageAtMost { .. }
        | ScenarioStep::AssertProgress { .. }
        | ScenarioStep::AssertOverlay { .. }
        | ScenarioStep::AssertSavedOffset { .. } => {}
    }
    Ok(())
}

fn evaluate(step: &ScenarioStep, snapshot: &DiagnosticsSnapshot) -> AssertionResult {
    match step {
        ScenarioStep::AssertState { state } => evaluate_assert_state(*state, snapshot),
        ScenarioStep::AssertPanelOffset { offset } => {
            evaluate_assert_close("panel_offset", *offset, snapshot.panel_offset, OFFSET_TOLERANCE)
        }
        ScenarioStep::AssertPageOffset { offset } => {
            evaluate_assert_close("page_offset", *offset, snapshot.page_offset, OFFSET_TOLERANCE)
        }
        ScenarioStep::AssertPageAtMost { offset } => {
            evaluate_assert_at_most("page_offset", *offset, snapshot.page_offset)
        }
        ScenarioStep::AssertProgress { value } => {
            evaluate_assert_close("progress", *value, snapshot.progress, PROGRESS_TOLERANCE)
        }
        ScenarioStep::AssertOverlay { id } => evaluate_assert_overlay(*id, snapshot),
        ScenarioStep::AssertSavedOffset { offset } => evaluate_assert_saved_offset(*offset, snapshot),
        _ => AssertionResult::Passed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_scenario_passes() {
        let outcome = run_scenario(r#"{"steps": []}"#).unwrap();
        assert!(!outcome.is_failed());
        assert_eq!(outcome.report().elapsed_frames, 0);
    }

    #[test]
    fn test_failure_reports_step_index() {
        let outcome = run_scenario(
            r#"{"steps": [
                {"type": "tick", "frames": 2},
                {"type": "assert_state", "state": "closed"},
                {"type": "assert_panel_offset", "offset": 100}
            ]}"#,
        )
        .unwrap();

        assert!(outcome.is_failed());
        let report = outcome.into_report();
        assert_eq!(report.failed_step_index, Some(2));
        assert_eq!(report.assertion.as_deref(), Some("assert_panel_offset"));
        assert_eq!(report.elapsed_frames, 2);
        assert_eq!(report.elapsed_ms, 32);
    }

    #[test]
    fn test_invalid_engine_settings_error() {
        let settings = RunSettings {
            engine: EngineConfig {
                wheel_multiplier: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(run_scenario_with(r#"{"steps": []}"#, settings).is_err());
    }
}
