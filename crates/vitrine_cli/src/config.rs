//! Vitrine configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use vitrine_app::{HeadlessRunConfig, RunSettings, StageConfig};
use vitrine_engine::EngineConfig;

pub const CONFIG_FILE: &str = "vitrine.toml";

/// Top-level Vitrine configuration (vitrine.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VitrineConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub stage: StageConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Headless clock settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    /// Logical milliseconds per frame
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Abort runs longer than this many frames
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,
}

fn default_tick_ms() -> u64 {
    16
}

fn default_max_frames() -> u64 {
    60_000
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            max_frames: default_max_frames(),
        }
    }
}

impl VitrineConfig {
    /// Load configuration from a file or a directory containing vitrine.toml
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_path = config_path(path);

        if !config_path.exists() {
            anyhow::bail!(
                "No {} found at {}. Run `vitrine init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        if let Err(err) = config.engine.validate() {
            tracing::warn!("rejected engine config in {}: {}", config_path.display(), err);
            return Err(err).with_context(|| format!("Invalid [engine] in {}", config_path.display()));
        }

        tracing::debug!("loaded {}", config_path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Settings for a headless run
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            runtime: HeadlessRunConfig {
                tick_ms: self.run.tick_ms,
                max_frames: self.run.max_frames,
            },
            engine: self.engine,
            stage: self.stage,
        }
    }
}

/// Resolve a file path, or `<dir>/vitrine.toml` for a directory
pub fn config_path(path: &Path) -> PathBuf {
    if path.is_file() {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    }
}
