mod config;
mod log_sink;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use delve_core::{CatalogSource, DungeonGenerator, seeded_rng};

use crate::config::RunnerConfig;
use crate::log_sink::LogSink;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ecosystem catalog (JSON, or RON with a .ron extension)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Seed for the random source (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Preferred biome
    #[arg(long)]
    biome: Option<String>,

    /// Fewest rooms
    #[arg(long)]
    rooms_min: Option<i32>,

    /// Most rooms
    #[arg(long)]
    rooms_max: Option<i32>,

    /// CR bias: below 1 favors weak creatures, above 1 favors strong ones
    #[arg(long)]
    cr_bias: Option<f32>,

    /// Population multiplier
    #[arg(long)]
    population: Option<f32>,

    /// Generation preset: default, sprawling, deadly, cramped
    #[arg(long)]
    preset: Option<String>,

    /// Runner config file (defaults to delve.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log the info panel of every room
    #[arg(long)]
    summaries: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut runner = RunnerConfig::load(args.config.as_deref())?;
    if args.preset.is_some() {
        runner.preset = args.preset.clone();
    }

    let mut generation = runner.resolved_generation()?;
    if let Some(biome) = &args.biome {
        generation.target_biome = biome.clone();
    }
    if let Some(min) = args.rooms_min {
        generation.rooms.min = min;
    }
    if let Some(max) = args.rooms_max {
        generation.rooms.max = max;
    }
    if let Some(bias) = args.cr_bias {
        generation.population.cr_bias = bias;
    }
    if let Some(multiplier) = args.population {
        generation.population.multiplier = multiplier;
    }

    let catalog_path = args.catalog.unwrap_or(runner.catalog.path);
    let seed = args
        .seed
        .or(runner.seed)
        .unwrap_or_else(rand::random::<u64>);

    log::info!(
        "Generating '{}' dungeon from {:?} (seed {})",
        generation.name,
        catalog_path,
        seed
    );

    let mut generator = DungeonGenerator::new(generation);
    let mut rng = seeded_rng(seed);
    let dungeon = generator
        .generate_from_source(&CatalogSource::Path(catalog_path.clone()), &mut rng)
        .with_context(|| format!("Failed to generate dungeon from {:?}", catalog_path))?;

    if runner.output.emit_scene {
        let mut sink = LogSink::default();
        dungeon.emit(&mut sink);
    }

    if args.summaries || runner.output.room_summaries {
        for id in 0..dungeon.room_count() {
            if let Some(summary) = dungeon.room_summary(id) {
                log::info!("\n{}", summary);
            }
        }
    }

    Ok(())
}
