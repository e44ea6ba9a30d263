//! Room graph construction and repair
//!
//! Rooms live in a flat arena indexed by dense id; adjacency is one ordered id
//! set per room. Construction links every room to its nearest neighbors, then
//! repair passes enforce the dungeon topology:
//! - the whole graph is one connected component
//! - START and GOAL never share an edge
//! - GOAL is a dead end with exactly one entrance, and never bridges other rooms

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Label of room 0
pub const START_LABEL: &str = "START";
/// Label of the last room
pub const GOAL_LABEL: &str = "GOAL";

/// A room in the dungeon graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomNode {
    pub id: usize,
    pub label: String,
}

impl RoomNode {
    /// Label for room `id` of a `count`-room dungeon
    pub fn label_for(id: usize, count: usize) -> String {
        if id == 0 {
            START_LABEL.to_string()
        } else if id + 1 == count {
            GOAL_LABEL.to_string()
        } else {
            format!("R{}", id)
        }
    }

    pub fn is_start(&self) -> bool {
        self.label == START_LABEL
    }

    pub fn is_goal(&self) -> bool {
        self.label == GOAL_LABEL
    }
}

/// Undirected room graph with symmetric adjacency
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DungeonGraph {
    nodes: Vec<RoomNode>,
    adjacency: Vec<BTreeSet<usize>>,
}

impl DungeonGraph {
    /// Graph of `count` labelled rooms and no edges
    pub fn with_rooms(count: usize) -> Self {
        Self {
            nodes: (0..count)
                .map(|id| RoomNode {
                    id,
                    label: RoomNode::label_for(id, count),
                })
                .collect(),
            adjacency: vec![BTreeSet::new(); count],
        }
    }

    /// Link every room to its `k` nearest rooms by squared distance
    ///
    /// `k` is clamped to `count - 1`. Each accepted pair is added in both directions.
    pub fn nearest_neighbors(positions: &[Vec2], k: usize) -> Self {
        let count = positions.len();
        let mut graph = Self::with_rooms(count);
        if count <= 1 {
            return graph;
        }

        let k = k.min(count - 1);
        for i in 0..count {
            let mut others: Vec<(usize, f32)> = (0..count)
                .filter(|&j| j != i)
                .map(|j| (j, positions[i].distance_squared(positions[j])))
                .collect();
            others.sort_by(|a, b| a.1.total_cmp(&b.1));

            for &(other, _) in others.iter().take(k) {
                graph.connect(i, other);
            }
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    pub fn node(&self, id: usize) -> Option<&RoomNode> {
        self.nodes.get(id)
    }

    /// Id of the START room
    pub fn start_id(&self) -> usize {
        0
    }

    /// Id of the GOAL room (0 for an empty graph)
    pub fn goal_id(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn neighbors(&self, id: usize) -> &BTreeSet<usize> {
        &self.adjacency[id]
    }

    pub fn degree(&self, id: usize) -> usize {
        self.adjacency.get(id).map_or(0, BTreeSet::len)
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Add an undirected edge; self-loops and out-of-range ids are ignored
    pub fn connect(&mut self, a: usize, b: usize) {
        if a == b || !self.is_valid(a) || !self.is_valid(b) {
            return;
        }
        self.adjacency[a].insert(b);
        self.adjacency[b].insert(a);
    }

    /// Remove an undirected edge if present
    pub fn disconnect(&mut self, a: usize, b: usize) {
        if !self.is_valid(a) || !self.is_valid(b) {
            return;
        }
        self.adjacency[a].remove(&b);
        self.adjacency[b].remove(&a);
    }

    fn is_valid(&self, id: usize) -> bool {
        id < self.adjacency.len()
    }

    /// Every undirected edge once, as `(low, high)` in ascending order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(a, set)| set.range(a + 1..).map(move |&b| (a, b)))
            .collect()
    }

    /// Sorted labels of a room's neighbors
    pub fn neighbor_labels(&self, id: usize) -> Vec<String> {
        let mut labels: Vec<String> = self.adjacency[id]
            .iter()
            .map(|&n| self.nodes[n].label.clone())
            .collect();
        labels.sort();
        labels
    }

    /// Connected components, each listed in traversal order
    pub fn components(&self) -> Vec<Vec<usize>> {
        self.collect_components(None)
    }

    /// Connected components ignoring `excluded` and every edge touching it
    pub fn components_excluding(&self, excluded: usize) -> Vec<Vec<usize>> {
        self.collect_components(Some(excluded))
    }

    pub fn is_connected(&self) -> bool {
        self.components().len() <= 1
    }

    fn collect_components(&self, excluded: Option<usize>) -> Vec<Vec<usize>> {
        let count = self.len();
        let mut visited = vec![false; count];
        let mut components = Vec::new();

        for root in 0..count {
            if visited[root] || Some(root) == excluded {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![root];
            visited[root] = true;
            while let Some(node) = stack.pop() {
                component.push(node);
                for &neighbor in &self.adjacency[node] {
                    if visited[neighbor] || Some(neighbor) == excluded {
                        continue;
                    }
                    visited[neighbor] = true;
                    stack.push(neighbor);
                }
            }
            components.push(component);
        }

        components
    }

    /// Merge components until the graph is connected
    ///
    /// Drops any START-GOAL edge first, then repeatedly links the closest pair
    /// of rooms in different components, never the START-GOAL pair.
    pub fn ensure_connected(&mut self, positions: &[Vec2], start: usize, goal: usize) {
        if self.is_empty() || positions.len() < self.len() {
            return;
        }

        self.disconnect(start, goal);

        let forbidden = |a: usize, b: usize| {
            (a == start && b == goal) || (a == goal && b == start)
        };
        let added = self.bridge_components(positions, None, forbidden);
        if added > 0 {
            log::debug!("Connectivity repair added {} edges", added);
        }
    }

    /// Make GOAL a dead end with exactly one entrance
    ///
    /// Keeps only GOAL's nearest neighbor, reconnects the rest of the dungeon
    /// without routing through GOAL, and force-links GOAL if it ends up isolated.
    pub fn ensure_goal_terminal(&mut self, positions: &[Vec2], start: usize, goal: usize) {
        if self.is_empty() || positions.len() < self.len() || !self.is_valid(goal) {
            return;
        }

        self.disconnect(start, goal);

        if self.degree(goal) == 0 {
            if let Some(nearest) = self.nearest_node(positions, goal) {
                self.connect(goal, nearest);
            }
        }

        if self.degree(goal) > 1 {
            let keep = closest_of(positions, goal, self.adjacency[goal].iter().copied());
            let extra: Vec<usize> = self.adjacency[goal]
                .iter()
                .copied()
                .filter(|&n| Some(n) != keep)
                .collect();
            for neighbor in extra {
                self.disconnect(goal, neighbor);
            }
        }

        let added = self.bridge_components(positions, Some(goal), |_, _| false);
        if added > 0 {
            log::debug!("Goal isolation repair added {} edges", added);
        }

        if self.degree(goal) == 0 {
            if let Some(fallback) = self.nearest_node(positions, goal) {
                self.connect(goal, fallback);
            }
        }
    }

    /// Link closest cross-component pairs until one component remains
    ///
    /// Returns the number of edges added. Stops early if no allowed pair exists.
    fn bridge_components<F>(
        &mut self,
        positions: &[Vec2],
        excluded: Option<usize>,
        forbidden: F,
    ) -> usize
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut added = 0;
        let mut components = self.collect_components(excluded);

        while components.len() > 1 {
            let mut best: Option<(usize, usize)> = None;
            let mut best_dist = f32::INFINITY;

            for (c, comp_a) in components.iter().enumerate() {
                for comp_b in &components[c + 1..] {
                    for &a in comp_a {
                        for &b in comp_b {
                            if forbidden(a, b) {
                                continue;
                            }
                            let dist = positions[a].distance_squared(positions[b]);
                            if dist < best_dist {
                                best_dist = dist;
                                best = Some((a, b));
                            }
                        }
                    }
                }
            }

            let Some((a, b)) = best else {
                if self.len() > 2 {
                    log::warn!(
                        "Connectivity repair stalled with {} components",
                        components.len()
                    );
                } else {
                    log::debug!("Two-room dungeon has no legal bridge before goal repair");
                }
                break;
            };

            self.connect(a, b);
            added += 1;
            components = self.collect_components(excluded);
        }

        added
    }

    /// Closest room to `from`, excluding `from` itself
    fn nearest_node(&self, positions: &[Vec2], from: usize) -> Option<usize> {
        closest_of(positions, from, (0..self.len()).filter(|&i| i != from))
    }
}

/// The candidate closest to `from` (first wins on ties)
fn closest_of(
    positions: &[Vec2],
    from: usize,
    candidates: impl IntoIterator<Item = usize>,
) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f32::INFINITY;
    for candidate in candidates {
        let dist = positions[from].distance_squared(positions[candidate]);
        if dist < best_dist {
            best_dist = dist;
            best = Some(candidate);
        }
    }
    best
}

/// Build the kNN graph and apply both repair passes
pub fn build_dungeon_graph(positions: &[Vec2], neighbors_per_node: usize) -> DungeonGraph {
    let mut graph = DungeonGraph::nearest_neighbors(positions, neighbors_per_node);
    if graph.len() < 2 {
        return graph;
    }

    let start = graph.start_id();
    let goal = graph.goal_id();
    graph.ensure_connected(positions, start, goal);
    graph.ensure_goal_terminal(positions, start, goal);

    log::debug!(
        "Built dungeon graph: {} rooms, {} edges",
        graph.len(),
        graph.edges().len()
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(count: usize) -> Vec<Vec2> {
        (0..count).map(|i| Vec2::new(i as f32, 0.0)).collect()
    }

    fn assert_symmetric(graph: &DungeonGraph) {
        for a in 0..graph.len() {
            for &b in graph.neighbors(a) {
                assert!(graph.has_edge(b, a), "edge {}->{} not mirrored", a, b);
            }
        }
    }

    #[test]
    fn test_labels() {
        let graph = DungeonGraph::with_rooms(4);
        let labels: Vec<&str> = graph.nodes().iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["START", "R1", "R2", "GOAL"]);
        assert!(graph.nodes()[0].is_start());
        assert!(graph.nodes()[3].is_goal());
    }

    #[test]
    fn test_nearest_neighbors_on_a_line() {
        let graph = DungeonGraph::nearest_neighbors(&line(5), 1);
        assert_symmetric(&graph);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(3, 4));
        assert!(!graph.has_edge(0, 2));
    }

    #[test]
    fn test_nearest_neighbors_clamps_k() {
        let graph = DungeonGraph::nearest_neighbors(&line(3), 10);
        assert_eq!(graph.edges(), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_single_room_has_no_edges() {
        let graph = build_dungeon_graph(&[Vec2::ZERO], 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_components_and_exclusion() {
        let mut graph = DungeonGraph::with_rooms(5);
        graph.connect(0, 1);
        graph.connect(1, 2);
        graph.connect(3, 4);
        assert_eq!(graph.components().len(), 2);

        // Removing 1 splits 0 from 2
        assert_eq!(graph.components_excluding(1).len(), 3);
    }

    #[test]
    fn test_connect_ignores_self_loops() {
        let mut graph = DungeonGraph::with_rooms(2);
        graph.connect(1, 1);
        graph.connect(0, 7);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_ensure_connected_bridges_closest_pair() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(11.0, 0.0),
            Vec2::new(50.0, 0.0),
        ];
        let mut graph = DungeonGraph::with_rooms(5);
        graph.connect(0, 1);
        graph.connect(2, 3);
        graph.connect(3, 4);

        graph.ensure_connected(&positions, 0, 4);
        assert!(graph.is_connected());
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn test_ensure_connected_removes_start_goal_edge() {
        let positions = line(4);
        let mut graph = DungeonGraph::with_rooms(4);
        graph.connect(0, 3);
        graph.connect(0, 1);
        graph.connect(1, 2);

        graph.ensure_connected(&positions, 0, 3);
        assert!(!graph.has_edge(0, 3));
        assert!(graph.has_edge(2, 3));
        assert!(graph.is_connected());
    }

    #[test]
    fn test_goal_keeps_only_nearest_neighbor() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(5.0, 3.0),
            Vec2::new(6.0, 1.0),
        ];
        let mut graph = DungeonGraph::with_rooms(4);
        graph.connect(0, 1);
        graph.connect(0, 2);
        graph.connect(3, 1);
        graph.connect(3, 2);

        graph.ensure_goal_terminal(&positions, 0, 3);
        assert_eq!(graph.degree(3), 1);
        assert!(graph.has_edge(3, 1));
        assert!(graph.is_connected());
        assert_symmetric(&graph);
    }

    #[test]
    fn test_goal_is_not_used_as_bridge() {
        // GOAL sits between two halves; after repair they must link directly
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(4.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(2.5, 0.0),
        ];
        let mut graph = DungeonGraph::with_rooms(5);
        graph.connect(0, 1);
        graph.connect(2, 3);
        graph.connect(1, 4);
        graph.connect(2, 4);

        graph.ensure_goal_terminal(&positions, 0, 4);
        assert_eq!(graph.degree(4), 1);
        assert_eq!(graph.components_excluding(4).len(), 1);
        assert!(graph.has_edge(1, 2));
    }

    #[test]
    fn test_two_rooms_goal_links_back_to_start() {
        let graph = build_dungeon_graph(&[Vec2::ZERO, Vec2::new(2.0, 0.0)], 2);
        assert_eq!(graph.degree(1), 1);
        assert!(graph.has_edge(0, 1));
        assert!(graph.is_connected());
    }

    #[test]
    fn test_neighbor_labels_sorted() {
        let mut graph = DungeonGraph::with_rooms(4);
        graph.connect(1, 3);
        graph.connect(1, 0);
        graph.connect(1, 2);
        assert_eq!(graph.neighbor_labels(1), vec!["GOAL", "R2", "START"]);
    }

    #[test]
    fn test_built_graph_invariants() {
        // Irregular cloud built from a deterministic sequence
        for count in 3..24 {
            let positions: Vec<Vec2> = (0..count)
                .map(|i| {
                    let t = i as f32;
                    Vec2::new((t * 2.399).sin() * t, (t * 2.399).cos() * t * 0.7)
                })
                .collect();

            let graph = build_dungeon_graph(&positions, 2);
            assert_symmetric(&graph);
            assert!(graph.is_connected(), "count {} not connected", count);
            assert!(!graph.has_edge(0, count - 1));
            assert_eq!(graph.degree(count - 1), 1);
        }
    }
}
