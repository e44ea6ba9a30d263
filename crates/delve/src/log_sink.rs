//! Scene sink that writes the layout to the log

use delve_core::{RoomData, SceneSink};
use glam::Vec2;

/// Logs rooms and edges instead of drawing them
#[derive(Debug, Default)]
pub struct LogSink {
    rooms: usize,
    edges: usize,
}

impl SceneSink for LogSink {
    fn begin(&mut self, biome: &str) {
        self.rooms = 0;
        self.edges = 0;
        log::info!("Scene ({})", biome);
    }

    fn room(&mut self, room: &RoomData, position: Vec2, scale: f32, neighbor_labels: &[String]) {
        self.rooms += 1;
        log::info!(
            "  {:<6} {:>7.2} {:>7.2}  scale {:.2}  {} {}  -> {}",
            room.label,
            position.x,
            position.y,
            scale,
            room.size,
            room.zone_type,
            neighbor_labels.join(", ")
        );
    }

    fn edge(&mut self, a: usize, b: usize, from: Vec2, to: Vec2) {
        self.edges += 1;
        log::debug!("  edge {}-{} length {:.2}", a, b, from.distance(to));
    }

    fn finish(&mut self) {
        log::info!("Scene done: {} rooms, {} edges", self.rooms, self.edges);
    }
}
