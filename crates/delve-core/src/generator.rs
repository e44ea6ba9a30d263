//! Dungeon generation pipeline
//!
//! One call samples positions, builds and repairs the room graph, populates
//! the rooms, then sizes and separates them. Every random decision is drawn
//! from the caller's [`DungeonRng`] in a fixed order:
//!
//! 1. room count
//! 2. noise offset, candidate positions and jitter, fallback positions
//! 3. biome, then per room: zone type, creature count, creature picks, populations
//! 4. per-room scale, then overlap fallback directions

use glam::Vec2;

use crate::catalog::{CatalogError, CatalogSource, EcosystemCatalog};
use crate::dungeon_config::DungeonGenConfig;
use crate::graph::{DungeonGraph, build_dungeon_graph};
use crate::layout::{LayoutResolver, RelaxationStats};
use crate::populator::{Populator, RoomData};
use crate::report::render_report;
use crate::rng_trait::DungeonRng;
use crate::sampler::PositionSampler;
use crate::sink::SceneSink;

/// Result of one generation call
#[derive(Debug, Clone)]
pub struct Dungeon {
    /// Name of the config that produced this dungeon
    pub config_name: String,
    /// Biome actually used
    pub biome: String,
    pub graph: DungeonGraph,
    /// One entry per graph node, in id order
    pub rooms: Vec<RoomData>,
    /// Room centers after overlap relaxation
    pub positions: Vec<Vec2>,
    pub scales: Vec<f32>,
    pub relaxation: RelaxationStats,
    /// Text produced by [`render_report`]
    pub report: String,
}

impl Dungeon {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Info panel text for one room
    pub fn room_summary(&self, id: usize) -> Option<String> {
        let room = self.rooms.get(id)?;
        Some(room.summary(&self.graph.neighbor_labels(id)))
    }

    /// Feed rooms then edges to a renderer
    pub fn emit<S: SceneSink + ?Sized>(&self, sink: &mut S) {
        sink.begin(&self.biome);

        for room in &self.rooms {
            let position = self.positions.get(room.id).copied().unwrap_or(Vec2::ZERO);
            let scale = self.scales.get(room.id).copied().unwrap_or(1.0);
            let neighbors = self.graph.neighbor_labels(room.id);
            sink.room(room, position, scale, &neighbors);
        }

        for (a, b) in self.graph.edges() {
            sink.edge(a, b, self.positions[a], self.positions[b]);
        }

        sink.finish();
    }
}

/// Generates dungeons from a config and keeps the most recent result
pub struct DungeonGenerator {
    config: DungeonGenConfig,
    latest: Option<Dungeon>,
}

impl Default for DungeonGenerator {
    fn default() -> Self {
        Self::new(DungeonGenConfig::default())
    }
}

impl DungeonGenerator {
    pub fn new(config: DungeonGenConfig) -> Self {
        Self {
            config,
            latest: None,
        }
    }

    /// Replace the configuration used by later calls
    ///
    /// The latest result is kept until the next successful generation.
    pub fn update_config(&mut self, config: DungeonGenConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &DungeonGenConfig {
        &self.config
    }

    /// Most recent dungeon, None before the first generation
    pub fn latest(&self) -> Option<&Dungeon> {
        self.latest.as_ref()
    }

    /// Biome of the latest dungeon, or the configured target before one exists
    pub fn current_biome(&self) -> &str {
        self.latest
            .as_ref()
            .map_or(self.config.target_biome.as_str(), |d| d.biome.as_str())
    }

    /// Load a catalog, then generate
    ///
    /// A load failure is logged and returned and the previous result stays in place.
    pub fn generate_from_source<R: DungeonRng + ?Sized>(
        &mut self,
        source: &CatalogSource,
        rng: &mut R,
    ) -> Result<&Dungeon, CatalogError> {
        let catalog = match source.load() {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("Failed to load ecosystem catalog: {}", e);
                return Err(e);
            }
        };
        Ok(self.generate(&catalog, rng))
    }

    /// Run the full pipeline and replace the latest result
    pub fn generate<R: DungeonRng + ?Sized>(
        &mut self,
        catalog: &EcosystemCatalog,
        rng: &mut R,
    ) -> &Dungeon {
        let dungeon = build_dungeon(&self.config, catalog, rng);
        log::info!("{}", dungeon.report);
        log::debug!(
            "Generated '{}' dungeon: {} rooms, {} edges, relaxation {} passes (converged: {})",
            dungeon.config_name,
            dungeon.room_count(),
            dungeon.graph.edges().len(),
            dungeon.relaxation.passes,
            dungeon.relaxation.converged
        );
        self.latest.insert(dungeon)
    }
}

/// Run the pipeline once without keeping any state
pub fn build_dungeon<R: DungeonRng + ?Sized>(
    config: &DungeonGenConfig,
    catalog: &EcosystemCatalog,
    rng: &mut R,
) -> Dungeon {
    let (min_rooms, max_rooms) = config.rooms.resolved();
    let room_count = rng.range_i32(min_rooms, max_rooms).max(0) as usize;

    let sampler = PositionSampler::new(&config.noise);
    let mut positions = sampler.sample(room_count, rng);

    let graph = build_dungeon_graph(&positions, config.neighbors_per_node);

    let populator = Populator::new(catalog, &config.population);
    let assignment = populator.assign(&graph, &config.target_biome, rng);
    let report = render_report(&graph, &assignment.biome, &assignment.rooms);

    let resolver = LayoutResolver::new(&config.layout);
    let scales = resolver.room_scales(&assignment.rooms, &positions, rng);
    let relaxation = resolver.resolve_overlaps(&mut positions, &scales, rng);

    Dungeon {
        config_name: config.name.clone(),
        biome: assignment.biome,
        graph,
        rooms: assignment.rooms,
        positions,
        scales,
        relaxation,
        report,
    }
}
