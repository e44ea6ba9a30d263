//! Human-readable dungeon reports

use crate::graph::DungeonGraph;
use crate::populator::RoomData;

const NONE: &str = "None";

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        NONE.to_string()
    } else {
        items.join(", ")
    }
}

/// Room-by-room listing of zones, occupants and adjacency
///
/// Each room's zone line is written before the blank separator and its label.
pub fn render_report(graph: &DungeonGraph, biome: &str, rooms: &[RoomData]) -> String {
    let mut lines = vec![
        "Rooms and Connections:".to_string(),
        format!("Biome: {}", biome),
    ];

    for room in rooms {
        let neighbors = if room.id < graph.len() {
            graph.neighbor_labels(room.id)
        } else {
            Vec::new()
        };

        lines.push(format!("  Zone: {}", room.zone_type));
        lines.push(String::new());
        lines.push(room.label.clone());
        lines.push(format!("  Creatures: {}", join_or_none(&room.occupants)));
        lines.push(format!("  Adjacent: {}", neighbors.join(", ")));
    }

    lines.join("\n")
}

impl RoomData {
    /// Info panel text for a selected room
    pub fn summary(&self, neighbors: &[String]) -> String {
        format!(
            "Room: {}\nZone: {}\nSize: {}\nCreatures: {}\nNeighbors: {}",
            self.label,
            self.zone_type,
            self.size,
            join_or_none(&self.occupants),
            join_or_none(neighbors)
        )
    }
}
