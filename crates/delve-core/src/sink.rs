//! Scene output trait
//!
//! Lets delve-core hand a finished layout to a renderer without depending on
//! any rendering backend.

use glam::Vec2;

use crate::populator::RoomData;

/// Trait for consuming a generated dungeon layout
pub trait SceneSink {
    /// A new layout is about to be emitted
    fn begin(&mut self, biome: &str);

    /// One room, emitted in id order
    fn room(&mut self, room: &RoomData, position: Vec2, scale: f32, neighbor_labels: &[String]);

    /// One undirected edge, emitted once per pair
    fn edge(&mut self, a: usize, b: usize, from: Vec2, to: Vec2);

    /// All rooms and edges were emitted
    fn finish(&mut self);
}

/// A no-op implementation for when no renderer is attached
#[derive(Debug, Default)]
pub struct NoopSink;

impl SceneSink for NoopSink {
    fn begin(&mut self, _biome: &str) {}
    fn room(&mut self, _room: &RoomData, _position: Vec2, _scale: f32, _neighbor_labels: &[String]) {}
    fn edge(&mut self, _a: usize, _b: usize, _from: Vec2, _to: Vec2) {}
    fn finish(&mut self) {}
}

/// A room as seen by [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRoom {
    pub id: usize,
    pub label: String,
    pub position: Vec2,
    pub scale: f32,
    pub neighbors: Vec<String>,
}

/// Stores everything it receives
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub biome: Option<String>,
    pub rooms: Vec<RecordedRoom>,
    pub edges: Vec<(usize, usize)>,
    pub finished: bool,
}

impl SceneSink for RecordingSink {
    fn begin(&mut self, biome: &str) {
        self.biome = Some(biome.to_string());
        self.rooms.clear();
        self.edges.clear();
        self.finished = false;
    }

    fn room(&mut self, room: &RoomData, position: Vec2, scale: f32, neighbor_labels: &[String]) {
        self.rooms.push(RecordedRoom {
            id: room.id,
            label: room.label.clone(),
            position,
            scale,
            neighbors: neighbor_labels.to_vec(),
        });
    }

    fn edge(&mut self, a: usize, b: usize, _from: Vec2, _to: Vec2) {
        self.edges.push((a, b));
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::populator::RoomSize;

    fn sample_room() -> RoomData {
        RoomData {
            id: 0,
            label: "START".to_string(),
            biome: "cave".to_string(),
            zone_type: "grotto".to_string(),
            occupants: Vec::new(),
            size: RoomSize::Large,
        }
    }

    #[test]
    fn test_noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.begin("cave");
        sink.room(&sample_room(), Vec2::ZERO, 1.0, &[]);
        sink.edge(0, 1, Vec2::ZERO, Vec2::ONE);
        sink.finish();
    }

    #[test]
    fn test_recording_sink_resets_on_begin() {
        let mut sink = RecordingSink::default();
        sink.begin("cave");
        sink.room(&sample_room(), Vec2::new(1.0, 2.0), 0.5, &["R1".to_string()]);
        sink.edge(0, 1, Vec2::ZERO, Vec2::ONE);
        sink.finish();

        assert_eq!(sink.biome.as_deref(), Some("cave"));
        assert_eq!(sink.rooms[0].neighbors, vec!["R1"]);
        assert_eq!(sink.edges, vec![(0, 1)]);
        assert!(sink.finished);

        sink.begin("forest");
        assert!(sink.rooms.is_empty());
        assert!(sink.edges.is_empty());
        assert!(!sink.finished);
    }

    #[test]
    fn test_sink_as_trait_object() {
        let mut recording = RecordingSink::default();
        {
            let sink: &mut dyn SceneSink = &mut recording;
            sink.begin("cave");
            sink.finish();
        }
        assert!(recording.finished);
    }
}
