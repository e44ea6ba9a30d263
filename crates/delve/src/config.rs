//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `delve.ron` file (if exists), or the file passed with `--config`
//! 3. Environment variables prefixed with `DELVE_`
//!
//! Example environment variable: `DELVE_GENERATION__TARGET_BIOME=cave`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use delve_core::DungeonGenConfig;
use serde::{Deserialize, Serialize};

/// Main runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Fixed seed; a random one is drawn when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Named preset applied before `generation` overrides from the CLI
    #[serde(default)]
    pub preset: Option<String>,

    #[serde(default)]
    pub generation: DungeonGenConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the ecosystem catalog lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON or `.ron` catalog document
    pub path: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ecosystem.json"),
        }
    }
}

/// What the runner logs after a generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Log every room and edge as it is emitted
    pub emit_scene: bool,
    /// Log the info panel text of each room
    pub room_summaries: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            emit_scene: true,
            room_summaries: false,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            seed: None,
            preset: None,
            generation: DungeonGenConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RunnerConfig {
    /// Load configuration with layered priority
    ///
    /// `path` replaces the default `delve.ron` and must exist when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_layered(path, true)
    }

    /// Same as [`Self::load`], with the environment layer optional
    fn load_layered(path: Option<&Path>, with_env: bool) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("delve").format(FileFormat::Ron).required(false),
        };

        let mut builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("catalog.path", "ecosystem.json")?
            .set_default("output.emit_scene", true)?
            .set_default("output.room_summaries", false)?
            // Layer 2: Config file
            .add_source(file);

        // Layer 3: Environment variables (DELVE_GENERATION__TARGET_BIOME, etc.)
        if with_env {
            builder = builder.add_source(
                Environment::with_prefix("DELVE")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generation parameters with the configured preset applied
    ///
    /// A preset replaces the whole `generation` table.
    pub fn resolved_generation(&self) -> Result<DungeonGenConfig> {
        match self.preset.as_deref() {
            Some(name) => DungeonGenConfig::preset(name)
                .with_context(|| format!("Unknown preset '{}'", name)),
            None => Ok(self.generation.clone()),
        }
    }
}
