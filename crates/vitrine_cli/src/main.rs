//! Vitrine CLI
//!
//! Runs headless showcase scenarios against the engine, writes a default
//! configuration file, and lists the project catalog.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vitrine_app::{run_loaded_scenario, HeadlessScenario, RunOutcome};
use vitrine_engine::ProjectCatalog;

use crate::config::{config_path, VitrineConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "vitrine")]
#[command(about = "Scroll-domain and overlay engine for the Vitrine showcase")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless scenario
    Run {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Configuration file or directory containing vitrine.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report here instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Write a default vitrine.toml
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the gallery projects
    Projects {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            scenario,
            config,
            report,
        } => cmd_run(&scenario, config.as_deref(), report.as_deref()),
        Commands::Init { path, force } => cmd_init(&path, force).map(|_| ExitCode::SUCCESS),
        Commands::Projects { json } => cmd_projects(json).map(|_| ExitCode::SUCCESS),
    }
}

fn cmd_run(scenario_path: &Path, config: Option<&Path>, report: Option<&Path>) -> Result<ExitCode> {
    let config = match config {
        Some(path) => VitrineConfig::load_from(path)?,
        None => VitrineConfig::default(),
    };
    let scenario = HeadlessScenario::from_path(scenario_path)?;

    info!(
        "Running {} ({} steps)",
        scenario.name.as_deref().unwrap_or_else(|| scenario_path.to_str().unwrap_or("scenario")),
        scenario.steps.len()
    );

    let outcome = run_loaded_scenario(&scenario, config.run_settings())?;
    match report {
        Some(path) => {
            outcome.report().write_to_path(path)?;
            info!("Report written to {}", path.display());
        }
        None => outcome.report().write_to_writer(&mut std::io::stdout().lock())?,
    }

    match outcome {
        RunOutcome::Passed { report } => {
            info!(
                "Passed in {} frames ({} ms)",
                report.elapsed_frames, report.elapsed_ms
            );
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::Failed { report } => {
            tracing::error!(
                "Failed at step {}: {}",
                report.failed_step_index.unwrap_or_default(),
                report.message.as_deref().unwrap_or("assertion failed")
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let target = config_path(path);

    if target.exists() && !force {
        anyhow::bail!(
            "{} already exists at {}. Use --force to overwrite.",
            CONFIG_FILE,
            target.display()
        );
    }

    let content = VitrineConfig::default().to_toml()?;
    fs::write(&target, content).with_context(|| format!("Failed to write {}", target.display()))?;
    info!("Wrote {}", target.display());
    Ok(())
}

fn cmd_projects(json: bool) -> Result<()> {
    let catalog = ProjectCatalog::default();

    if json {
        let entries: Vec<_> = catalog
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "title": p.title,
                    "description": p.description,
                    "hero_image": p.hero_image,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for project in catalog.iter() {
        println!("{:<14} {:<14} {}", project.id, project.title, project.description);
    }
    Ok(())
}
