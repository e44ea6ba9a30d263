use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use delve_core::{DungeonGenConfig, EcosystemCatalog, build_dungeon, seeded_rng};

const CATALOG_JSON: &str = r#"{
    "biomes": [
        { "name": "forest", "zone_types": ["clearing", "thicket", "grove"] }
    ],
    "creatures": [
        { "name": "Rat", "biomes": ["forest"], "cr": 0.125, "population_range": [4, 10] },
        { "name": "Wolf", "biomes": ["forest"], "cr": 1, "population_range": [2, 4] },
        { "name": "Owlbear", "biomes": ["forest"], "cr": 3, "population_range": [1, 2] },
        { "name": "Treant", "biomes": ["forest"], "cr": 9, "population_range": [1, 1] }
    ]
}"#;

fn bench_default_dungeon(c: &mut Criterion) {
    let catalog = EcosystemCatalog::from_json_str(CATALOG_JSON).unwrap();
    let config = DungeonGenConfig::default();
    let mut rng = seeded_rng(42);
    c.bench_function("generate_default", |bencher| {
        bencher.iter(|| black_box(build_dungeon(&config, &catalog, &mut rng)))
    });
}

fn bench_sprawling_dungeon(c: &mut Criterion) {
    let catalog = EcosystemCatalog::from_json_str(CATALOG_JSON).unwrap();
    let config = DungeonGenConfig::preset_sprawling();
    let mut rng = seeded_rng(42);
    c.bench_function("generate_sprawling", |bencher| {
        bencher.iter(|| black_box(build_dungeon(&config, &catalog, &mut rng)))
    });
}

criterion_group!(benches, bench_default_dungeon, bench_sprawling_dungeon);
criterion_main!(benches);
