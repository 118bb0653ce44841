//! Vitrine App
//!
//! Runs the showcase engine against a simulated document on a
//! deterministic frame clock. Scenarios are JSON step lists; every run ends
//! in a [`HeadlessReport`].
//!
//! # Example
//!
//! ```rust
//! use vitrine_app::run_scenario;
//!
//! let outcome = run_scenario(r#"{
//!     "steps": [
//!         {"type": "set_panel_offset", "offset": 100},
//!         {"type": "wheel", "delta_y": 40, "x": 200, "y": 300},
//!         {"type": "assert_panel_offset", "offset": 200}
//!     ]
//! }"#).unwrap();
//! assert!(!outcome.is_failed());
//! ```

pub mod headless_assert;
pub mod headless_report;
pub mod headless_runner;
pub mod headless_runtime;
pub mod headless_scenario;
pub mod stage;

pub use headless_report::{HeadlessReport, ReportStatus};
pub use headless_runner::{run_loaded_scenario, run_scenario, run_scenario_with, RunOutcome, RunSettings};
pub use headless_runtime::{HeadlessRunConfig, HeadlessRuntime};
pub use headless_scenario::{HeadlessScenario, ScenarioStep};
pub use stage::{HeadlessStage, StageConfig, StageSignal, MODAL_CONTAINER, MODAL_HERO};
