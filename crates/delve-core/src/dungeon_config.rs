//! Dungeon generation configuration - serializable parameters for one generation call
//!
//! Captures every tunable of the pipeline so a run can be described by a RON
//! preset. The random seed is NOT part of the config: same config + different
//! seed = different dungeon.

use serde::{Deserialize, Serialize};

use crate::populator::RoomSize;

/// Complete dungeon generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonGenConfig {
    /// Display name for this configuration
    pub name: String,

    /// Room count bounds
    pub rooms: RoomCountParams,

    /// Biome requested from the catalog (falls back to a random biome)
    pub target_biome: String,

    /// Nearest neighbors each room links to before repair (default: 2)
    pub neighbors_per_node: usize,

    /// Creature selection and population
    pub population: PopulationParams,

    /// Candidate sampling for room positions
    pub noise: NoiseParams,

    /// Room sizing and overlap relaxation
    pub layout: LayoutParams,
}

/// Room count bounds, resolved per call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomCountParams {
    /// Fewest rooms (default: 8)
    pub min: i32,
    /// Most rooms (default: 14)
    pub max: i32,
}

/// Creature selection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// CR bias ratio. < 1 favors safer creatures, > 1 favors dangerous creatures
    pub cr_bias: f32,
    /// Scales every creature's population bounds (floor: 0.1)
    pub multiplier: f32,
}

/// Noise-scored candidate sampling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Noise frequency applied to candidate coordinates (default: 0.18)
    pub scale: f32,
    /// Random score perturbation, applied as `uniform(-jitter, jitter) * 0.1`
    pub jitter: f32,
    /// Minimum distance between accepted rooms (floor: 0.5)
    pub min_spacing: f32,
    /// Candidates generated per room (default: 6)
    pub candidate_multiplier: usize,
    /// Fractal octaves (floor: 1)
    pub octaves: u32,
    /// Frequency multiplier per octave (floor: 1.0)
    pub lacunarity: f32,
    /// Amplitude multiplier per octave (clamped to 0.0-1.0)
    pub gain: f32,
    /// Side length of the sampling area per room (default: 1.6)
    pub room_spacing: f32,
    /// Seed of the coherent noise field
    pub seed: i32,
}

/// Room sizing and overlap relaxation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Global room size multiplier (floor: 0.01)
    pub room_scale_multiplier: f32,
    /// Logical size range for biomes without an override
    pub default_size_range: (f32, f32),
    /// Per-biome size range overrides
    pub biome_sizes: Vec<BiomeRoomSize>,
    /// Relaxation pass budget (floor: 1)
    pub overlap_iterations: u32,
    /// Extra gap required between room footprints
    pub overlap_padding: f32,
    /// Footprint diameter of a room at scale 1.0 (floor: 0.1)
    pub base_diameter: f32,
}

/// Logical size range override for one biome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeRoomSize {
    /// Biome name (matched case-insensitively)
    pub biome: String,
    /// `(min, max)` logical size
    pub size_range: (f32, f32),
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for DungeonGenConfig {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            rooms: RoomCountParams::default(),
            target_biome: "forest".to_string(),
            neighbors_per_node: 2,
            population: PopulationParams::default(),
            noise: NoiseParams::default(),
            layout: LayoutParams::default(),
        }
    }
}

impl Default for RoomCountParams {
    fn default() -> Self {
        Self { min: 8, max: 14 }
    }
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self {
            cr_bias: 1.0,
            multiplier: 1.0,
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        Self {
            scale: 0.18,
            jitter: 0.5,
            min_spacing: 0.9,
            candidate_multiplier: 6,
            octaves: 4,
            lacunarity: 2.0,
            gain: 0.5,
            room_spacing: 1.6,
            seed: 1337,
        }
    }
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            room_scale_multiplier: 0.8,
            default_size_range: (1.0, 1.5),
            biome_sizes: Vec::new(),
            overlap_iterations: 40,
            overlap_padding: 0.18,
            base_diameter: 1.0,
        }
    }
}

// ============================================================================
// Resolution helpers
// ============================================================================

/// Fewest rooms a dungeon can have (start + goal)
pub const MIN_ROOMS: i32 = 2;

impl RoomCountParams {
    /// Bounds floored at [`MIN_ROOMS`] and swapped if inverted
    pub fn resolved(&self) -> (i32, i32) {
        let min = self.min.max(MIN_ROOMS);
        let max = self.max.max(MIN_ROOMS);
        if min > max {
            (max, min)
        } else {
            (min, max)
        }
    }
}

impl PopulationParams {
    /// Bias clamped to a range where `ln` stays finite
    pub fn effective_bias(&self) -> f32 {
        self.cr_bias.clamp(0.000_001, 1_000_000.0)
    }

    /// Multiplier floored at 0.1
    pub fn effective_multiplier(&self) -> f32 {
        self.multiplier.max(0.1)
    }
}

impl LayoutParams {
    /// Logical size range for a biome (override if present, else default)
    pub fn size_range_for(&self, biome: &str) -> (f32, f32) {
        self.biome_sizes
            .iter()
            .filter(|entry| !entry.biome.trim().is_empty())
            .find(|entry| entry.biome.eq_ignore_ascii_case(biome))
            .map(|entry| entry.size_range)
            .unwrap_or(self.default_size_range)
    }

    /// Scale multiplier of a size class
    pub fn size_multiplier(size: RoomSize) -> f32 {
        match size {
            RoomSize::Small => 0.85,
            RoomSize::Medium => 1.0,
            RoomSize::Large => 1.35,
        }
    }
}

// ============================================================================
// Preset helpers
// ============================================================================

impl DungeonGenConfig {
    /// Parse a RON preset
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Serialize to pretty RON
    pub fn to_ron_string(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "default" => Some(Self::default()),
            "sprawling" => Some(Self::preset_sprawling()),
            "deadly" => Some(Self::preset_deadly()),
            "cramped" => Some(Self::preset_cramped()),
            _ => None,
        }
    }

    /// Create a preset with many loosely connected rooms
    pub fn preset_sprawling() -> Self {
        Self {
            name: "Sprawling".to_string(),
            rooms: RoomCountParams { min: 18, max: 28 },
            noise: NoiseParams {
                min_spacing: 1.4,
                room_spacing: 2.2,
                ..NoiseParams::default()
            },
            ..Self::default()
        }
    }

    /// Create a preset that favors high-CR creatures in bigger groups
    pub fn preset_deadly() -> Self {
        Self {
            name: "Deadly".to_string(),
            population: PopulationParams {
                cr_bias: 8.0,
                multiplier: 1.5,
            },
            ..Self::default()
        }
    }

    /// Create a preset with few, densely packed rooms
    pub fn preset_cramped() -> Self {
        Self {
            name: "Cramped".to_string(),
            rooms: RoomCountParams { min: 4, max: 6 },
            neighbors_per_node: 3,
            noise: NoiseParams {
                min_spacing: 0.5,
                room_spacing: 1.0,
                ..NoiseParams::default()
            },
            layout: LayoutParams {
                overlap_padding: 0.05,
                ..LayoutParams::default()
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DungeonGenConfig::default();
        assert_eq!(config.name, "Default");
        assert_eq!(config.rooms.resolved(), (8, 14));
        assert_eq!(config.target_biome, "forest");
        assert_eq!(config.neighbors_per_node, 2);
        assert_eq!(config.layout.overlap_iterations, 40);
    }

    #[test]
    fn test_room_bounds_are_floored_and_swapped() {
        let inverted = RoomCountParams { min: 10, max: 3 };
        assert_eq!(inverted.resolved(), (3, 10));

        let tiny = RoomCountParams { min: -4, max: 1 };
        assert_eq!(tiny.resolved(), (2, 2));
    }

    #[test]
    fn test_population_clamps() {
        let params = PopulationParams {
            cr_bias: 0.0,
            multiplier: 0.0,
        };
        assert_eq!(params.effective_bias(), 0.000_001);
        assert_eq!(params.effective_multiplier(), 0.1);

        let huge = PopulationParams {
            cr_bias: 1e9,
            multiplier: 2.0,
        };
        assert_eq!(huge.effective_bias(), 1_000_000.0);
        assert_eq!(huge.effective_multiplier(), 2.0);
    }

    #[test]
    fn test_biome_size_override() {
        let layout = LayoutParams {
            biome_sizes: vec![BiomeRoomSize {
                biome: "Cave".to_string(),
                size_range: (0.5, 0.7),
            }],
            ..LayoutParams::default()
        };
        assert_eq!(layout.size_range_for("cave"), (0.5, 0.7));
        assert_eq!(layout.size_range_for("forest"), (1.0, 1.5));
    }

    #[test]
    fn test_size_multipliers() {
        assert_eq!(LayoutParams::size_multiplier(RoomSize::Small), 0.85);
        assert_eq!(LayoutParams::size_multiplier(RoomSize::Medium), 1.0);
        assert_eq!(LayoutParams::size_multiplier(RoomSize::Large), 1.35);
    }

    #[test]
    fn test_ron_serialization() {
        let config = DungeonGenConfig::preset_cramped();
        let serialized = config.to_ron_string().expect("Failed to serialize");
        let deserialized =
            DungeonGenConfig::from_ron_str(&serialized).expect("Failed to deserialize");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = DungeonGenConfig::from_ron_str(r#"(name: "Partial", target_biome: "cave")"#)
            .expect("Failed to parse partial config");
        assert_eq!(config.name, "Partial");
        assert_eq!(config.target_biome, "cave");
        assert_eq!(config.noise, NoiseParams::default());
    }

    #[test]
    fn test_partial_nested_tables() {
        let config = DungeonGenConfig::from_ron_str(
            r#"(layout: (biome_sizes: [(biome: "cave", size_range: (0.8, 1.2))]), rooms: (max: 20))"#,
        )
        .expect("Failed to parse nested config");
        assert_eq!(config.rooms.resolved(), (8, 20));
        assert_eq!(config.layout.overlap_iterations, 40);
        assert_eq!(config.layout.size_range_for("CAVE"), (0.8, 1.2));
    }

    #[test]
    fn test_presets() {
        let sprawling = DungeonGenConfig::preset_sprawling();
        assert!(sprawling.rooms.min > DungeonGenConfig::default().rooms.max);

        let deadly = DungeonGenConfig::preset("DEADLY").expect("Preset should exist");
        assert!(deadly.population.cr_bias > 1.0);

        assert!(DungeonGenConfig::preset("nonexistent").is_none());
    }
}
