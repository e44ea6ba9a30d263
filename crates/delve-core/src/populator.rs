//! Room population - biome, zone type, size class and creature occupants
//!
//! Creatures are drawn per room without replacement from the biome's pool.
//! Each candidate's CR is normalized over the remaining pool to `t` in [0, 1]
//! and weighted `exp(ln(bias) * t)`: bias < 1 favors safer creatures, bias > 1
//! favors dangerous ones, bias == 1 is uniform.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{BiomeDef, CreatureDef, EcosystemCatalog};
use crate::dungeon_config::PopulationParams;
use crate::graph::{DungeonGraph, RoomNode};
use crate::rng_trait::DungeonRng;

/// Fallback name for a missing biome or zone type
pub const UNKNOWN: &str = "unknown";
/// Most distinct creature kinds per room
pub const MAX_CREATURES_PER_ROOM: usize = 3;
/// Smallest CR spread used for normalization
const MIN_CR_RANGE: f32 = 0.000_001;

/// Visual size class of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomSize {
    Small,
    Medium,
    Large,
}

impl RoomSize {
    /// Size class from label and degree: START/GOAL and hubs are large
    pub fn classify(node: &RoomNode, degree: usize) -> Self {
        if node.is_start() || node.is_goal() {
            return RoomSize::Large;
        }
        match degree {
            0 | 1 => RoomSize::Small,
            2 => RoomSize::Medium,
            _ => RoomSize::Large,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomSize::Small => "Small",
            RoomSize::Medium => "Medium",
            RoomSize::Large => "Large",
        }
    }
}

impl fmt::Display for RoomSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the renderer needs to know about one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    pub id: usize,
    pub label: String,
    pub biome: String,
    pub zone_type: String,
    /// `"<name> x<count>"` entries in pick order
    pub occupants: Vec<String>,
    pub size: RoomSize,
}

impl RoomData {
    /// Parsed occupants, skipping blank entries
    pub fn parsed_occupants(&self) -> Vec<Occupant> {
        self.occupants
            .iter()
            .filter_map(|o| Occupant::parse(o))
            .collect()
    }
}

/// Parsed view of an occupant string such as `"Wolf x3"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupant {
    /// Base creature name
    pub name: String,
    /// Head count, None when the suffix is missing or malformed
    pub count: Option<u32>,
}

impl Occupant {
    /// Split an occupant string at its last `" x"` (case-insensitive)
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        // ASCII lowercasing keeps byte offsets aligned with `trimmed`
        let lowered = trimmed.to_ascii_lowercase();
        match lowered.rfind(" x") {
            Some(idx) if idx > 0 => Some(Self {
                name: trimmed[..idx].trim().to_string(),
                count: trimmed[idx + 2..].trim().parse().ok(),
            }),
            _ => Some(Self {
                name: trimmed.to_string(),
                count: None,
            }),
        }
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.count {
            Some(count) => write!(f, "{} x{}", self.name, count),
            None => f.write_str(&self.name),
        }
    }
}

/// Result of populating a graph
#[derive(Debug, Clone, PartialEq)]
pub struct RoomAssignment {
    /// Biome actually used (may differ from the requested one)
    pub biome: String,
    /// One entry per graph node, in id order
    pub rooms: Vec<RoomData>,
}

/// Assigns biome, zone types and creatures to rooms
pub struct Populator<'a> {
    catalog: &'a EcosystemCatalog,
    bias: f32,
    multiplier: f32,
}

impl<'a> Populator<'a> {
    pub fn new(catalog: &'a EcosystemCatalog, params: &PopulationParams) -> Self {
        Self {
            catalog,
            bias: params.effective_bias(),
            multiplier: params.effective_multiplier(),
        }
    }

    /// Requested biome if the catalog has it, else a random catalog biome
    pub fn resolve_biome<R: DungeonRng + ?Sized>(&self, preferred: &str, rng: &mut R) -> String {
        if let Some(biome) = self.catalog.biome(preferred) {
            return biome.name.clone();
        }

        rng.pick_index(self.catalog.biomes.len())
            .map(|idx| self.catalog.biomes[idx].name.trim())
            .filter(|name| !name.is_empty())
            .map_or_else(|| UNKNOWN.to_string(), str::to_string)
    }

    /// Uniform zone type of a biome ("unknown" when it has none)
    pub fn pick_zone_type<R: DungeonRng + ?Sized>(biome: Option<&BiomeDef>, rng: &mut R) -> String {
        let Some(zones) = biome.map(|b| &b.zone_types).filter(|z| !z.is_empty()) else {
            return UNKNOWN.to_string();
        };

        rng.pick_index(zones.len())
            .map(|idx| zones[idx].trim())
            .filter(|zone| !zone.is_empty())
            .map_or_else(|| UNKNOWN.to_string(), str::to_string)
    }

    /// Selection weight of a creature given the pool's CR range
    pub fn creature_weight(cr: f32, min_cr: f32, max_cr: f32, bias: f32) -> f32 {
        let range = (max_cr - min_cr).max(MIN_CR_RANGE);
        let t = ((cr - min_cr) / range).clamp(0.0, 1.0);
        (bias.ln() * t).exp()
    }

    /// Roulette-pick an index from `pool` using CR-biased weights
    pub fn pick_weighted<R: DungeonRng + ?Sized>(
        &self,
        pool: &[&CreatureDef],
        rng: &mut R,
    ) -> Option<usize> {
        if pool.is_empty() {
            return None;
        }

        let (min_cr, max_cr) = pool.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), c| (lo.min(c.cr), hi.max(c.cr)),
        );
        if !min_cr.is_finite() || !max_cr.is_finite() {
            return rng.pick_index(pool.len());
        }

        let weights: Vec<f32> = pool
            .iter()
            .map(|c| Self::creature_weight(c.cr, min_cr, max_cr, self.bias))
            .collect();
        let total: f32 = weights.iter().sum();
        if !(total > 0.0) || !total.is_finite() {
            return rng.pick_index(pool.len());
        }

        let mut roll = rng.gen_f32() * total;
        for (idx, weight) in weights.iter().enumerate() {
            roll -= weight;
            if roll <= 0.0 {
                return Some(idx);
            }
        }
        Some(pool.len() - 1)
    }

    /// Inclusive population bounds of a creature after the multiplier
    pub fn population_bounds(&self, creature: &CreatureDef) -> (i32, i32) {
        let (raw_min, raw_max) = creature.population_bounds().unwrap_or((1, 1));
        let min_pop = raw_min.max(1);
        let max_pop = raw_max.max(min_pop);
        let pop_min = ((min_pop as f32 * self.multiplier).round_ties_even() as i32).max(1);
        let pop_max = ((max_pop as f32 * self.multiplier).round_ties_even() as i32).max(pop_min);
        (pop_min, pop_max)
    }

    /// Draw up to three distinct creatures for one room
    pub fn pick_creatures<'c, R: DungeonRng + ?Sized>(
        &self,
        options: &[&'c CreatureDef],
        rng: &mut R,
    ) -> Vec<&'c CreatureDef> {
        let max_pick = options.len().min(MAX_CREATURES_PER_ROOM);
        if max_pick == 0 {
            return Vec::new();
        }

        let selected_count = rng.range_i32(1, max_pick as i32) as usize;
        let mut pool: Vec<&CreatureDef> = options.to_vec();
        let mut selected = Vec::with_capacity(selected_count);
        for _ in 0..selected_count {
            let Some(idx) = self.pick_weighted(&pool, rng) else {
                break;
            };
            selected.push(pool.remove(idx));
        }
        selected
    }

    /// Populate every room of the graph
    pub fn assign<R: DungeonRng + ?Sized>(
        &self,
        graph: &DungeonGraph,
        preferred_biome: &str,
        rng: &mut R,
    ) -> RoomAssignment {
        let biome = self.resolve_biome(preferred_biome, rng);
        let biome_def = self.catalog.biome(&biome);
        let options = self.catalog.spawnable_in(&biome);

        if biome_def.is_none() {
            log::debug!("Populating with fallback biome '{}'", biome);
        }
        if options.is_empty() {
            log::debug!("No creatures can spawn in biome '{}'", biome);
        }

        let rooms = graph
            .nodes()
            .iter()
            .map(|node| {
                let size = RoomSize::classify(node, graph.degree(node.id));
                let zone_type = Self::pick_zone_type(biome_def, rng);
                let occupants = self
                    .pick_creatures(&options, rng)
                    .into_iter()
                    .map(|creature| {
                        let (lo, hi) = self.population_bounds(creature);
                        format!("{} x{}", creature.name, rng.range_i32(lo, hi))
                    })
                    .collect();

                RoomData {
                    id: node.id,
                    label: node.label.clone(),
                    biome: biome.clone(),
                    zone_type,
                    occupants,
                    size,
                }
            })
            .collect();

        RoomAssignment { biome, rooms }
    }
}
