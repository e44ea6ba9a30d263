//! Ecosystem catalog - creatures and biomes the populator draws from
//!
//! The catalog is the only external input of a generation call. It is parsed
//! and validated here, at the boundary, so later stages can assume a
//! well-formed document and never raise input errors themselves.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::populator::Occupant;

/// Errors raised while loading a catalog document
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No document at the given path
    #[error("catalog not found: {0}")]
    Missing(PathBuf),

    /// I/O error reading the document
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// RON deserialization error
    #[error("failed to parse catalog RON: {0}")]
    Ron(#[from] ron::error::SpannedError),

    /// Inline document was blank
    #[error("catalog document is empty")]
    Empty,
}

/// Where a catalog document comes from
#[derive(Debug, Clone)]
pub enum CatalogSource {
    /// File on disk, format chosen by extension (`.ron` or JSON otherwise)
    Path(PathBuf),
    /// Inline JSON text
    Json(String),
    /// Inline RON text
    Ron(String),
}

impl CatalogSource {
    /// Load and parse the document
    pub fn load(&self) -> Result<EcosystemCatalog, CatalogError> {
        match self {
            CatalogSource::Path(path) => EcosystemCatalog::load(path),
            CatalogSource::Json(text) => EcosystemCatalog::from_json_str(text),
            CatalogSource::Ron(text) => EcosystemCatalog::from_ron_str(text),
        }
    }
}

/// A creature that can occupy rooms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureDef {
    pub name: String,
    /// Biomes this creature lives in (matched case-insensitively)
    pub biomes: Vec<String>,
    /// Challenge rating
    pub cr: f32,
    /// Free-form ecological role ("predator", "scavenger", ...)
    pub role: Option<String>,
    /// Population bounds `[min, max]`; fewer than two entries excludes the creature
    pub population_range: Vec<i32>,
    /// Sprite reference resolved by the renderer
    #[serde(rename = "spritePath", alias = "sprite_path")]
    pub sprite_path: Option<String>,
}

impl CreatureDef {
    /// Check if this creature lives in the given biome
    pub fn has_biome(&self, biome: &str) -> bool {
        self.biomes.iter().any(|b| b.eq_ignore_ascii_case(biome))
    }

    /// Population bounds as `(min, max)`, None when the range is incomplete
    pub fn population_bounds(&self) -> Option<(i32, i32)> {
        match self.population_range.as_slice() {
            [min, max, ..] => Some((*min, *max)),
            _ => None,
        }
    }

    /// Whether the creature can be placed at all
    pub fn can_spawn(&self) -> bool {
        matches!(self.population_bounds(), Some((_, max)) if max > 0)
    }
}

/// A biome and the zone types its rooms can take
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeDef {
    pub name: String,
    pub description: Option<String>,
    pub light_level: Option<String>,
    pub water_level: Option<String>,
    pub temperature: Option<String>,
    pub primary_resources: Vec<String>,
    pub zone_types: Vec<String>,
}

/// Parsed ecosystem document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EcosystemCatalog {
    pub creatures: Vec<CreatureDef>,
    pub biomes: Vec<BiomeDef>,
}

impl EcosystemCatalog {
    /// Parse a JSON document
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        if text.trim().is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(serde_json::from_str(text)?)
    }

    /// Parse a RON document
    pub fn from_ron_str(text: &str) -> Result<Self, CatalogError> {
        if text.trim().is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(ron::from_str(text)?)
    }

    /// Load a document from disk (`.ron` parsed as RON, everything else as JSON)
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::Missing(path.to_path_buf()));
        }

        let text = std::fs::read_to_string(path)?;
        let is_ron = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ron"));

        let catalog = if is_ron {
            Self::from_ron_str(&text)?
        } else {
            Self::from_json_str(&text)?
        };

        log::debug!(
            "Loaded catalog {:?}: {} creatures, {} biomes",
            path,
            catalog.creatures.len(),
            catalog.biomes.len()
        );
        Ok(catalog)
    }

    /// Look up a biome by name (case-insensitive)
    pub fn biome(&self, name: &str) -> Option<&BiomeDef> {
        if name.trim().is_empty() {
            return None;
        }
        self.biomes
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Look up a creature by name (case-insensitive)
    pub fn creature(&self, name: &str) -> Option<&CreatureDef> {
        self.creatures
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Creatures that can spawn in the given biome, in catalog order
    pub fn spawnable_in(&self, biome: &str) -> Vec<&CreatureDef> {
        self.creatures
            .iter()
            .filter(|c| c.can_spawn() && c.has_biome(biome))
            .collect()
    }

    /// Sprite reference for an occupant string such as `"Wolf x3"`
    pub fn sprite_for(&self, occupant: &str) -> Option<&str> {
        let parsed = Occupant::parse(occupant)?;
        self.creature(&parsed.name)?
            .sprite_path
            .as_deref()
            .filter(|path| !path.trim().is_empty())
    }
}
