//! Procedural dungeon generation for Delve
//!
//! This crate turns an ecosystem catalog and a random source into a dungeon:
//! - Noise-scored room positions (PositionSampler)
//! - A connected room graph with a single-entrance goal (DungeonGraph)
//! - Biome, zone and CR-weighted creature assignment (Populator)
//! - Room scales and overlap relaxation (LayoutResolver)
//!
//! Rendering is left to the caller through [`SceneSink`].

pub mod catalog;
pub mod dungeon_config;
pub mod generator;
pub mod graph;
pub mod layout;
pub mod populator;
pub mod report;
pub mod rng_trait;
pub mod sampler;
pub mod sink;

pub use catalog::{BiomeDef, CatalogError, CatalogSource, CreatureDef, EcosystemCatalog};
pub use dungeon_config::DungeonGenConfig;
pub use generator::{Dungeon, DungeonGenerator, build_dungeon};
pub use graph::{DungeonGraph, RoomNode, build_dungeon_graph};
pub use layout::{LayoutResolver, RelaxationStats};
pub use populator::{Occupant, Populator, RoomAssignment, RoomData, RoomSize};
pub use report::render_report;
pub use rng_trait::DungeonRng;
#[cfg(feature = "seeded")]
pub use rng_trait::seeded_rng;
pub use sampler::PositionSampler;
pub use sink::{NoopSink, RecordingSink, SceneSink};
