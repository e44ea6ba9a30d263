//! Room sizing and overlap relaxation
//!
//! Scales come from the biome's logical size range, the global multiplier and
//! the room's size class, capped by how tightly the rooms were sampled. The
//! relaxation pass then pushes overlapping footprints apart pairwise.

use glam::Vec2;

use crate::dungeon_config::LayoutParams;
use crate::populator::RoomData;
use crate::rng_trait::DungeonRng;

/// Smallest room scale
pub const MIN_ROOM_SCALE: f32 = 0.05;
/// Smallest footprint diameter at scale 1.0
const MIN_BASE_DIAMETER: f32 = 0.1;
/// Floor of the global scale multiplier
const MIN_SCALE_MULTIPLIER: f32 = 0.01;
/// Share of the closest room distance a room may fill
const MAX_SCALE_OF_MIN_DISTANCE: f32 = 0.9;
/// Closest-distance threshold below which no cap is applied
const MIN_CAP_DISTANCE: f32 = 0.01;
/// Distance below which two rooms are treated as coincident
const COINCIDENT_DISTANCE: f32 = 0.001;

/// Outcome of one relaxation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelaxationStats {
    /// Passes executed (a final pass without movement counts)
    pub passes: u32,
    /// Whether a pass finished without moving any room
    pub converged: bool,
}

/// Computes room scales and separates overlapping rooms
pub struct LayoutResolver {
    params: LayoutParams,
}

impl LayoutResolver {
    pub fn new(params: &LayoutParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    /// Footprint diameter of a room at scale 1.0
    pub fn base_diameter(&self) -> f32 {
        self.params.base_diameter.max(MIN_BASE_DIAMETER)
    }

    /// Pass budget for [`Self::resolve_overlaps`]
    pub fn iteration_budget(&self) -> u32 {
        self.params.overlap_iterations.max(1)
    }

    /// Distance required between two room centers
    pub fn required_separation(&self, scale_a: f32, scale_b: f32) -> f32 {
        let base = self.base_diameter();
        scale_a * base * 0.5 + scale_b * base * 0.5 + self.params.overlap_padding
    }

    /// Scale of one room, consuming one draw
    pub fn room_scale<R: DungeonRng + ?Sized>(
        &self,
        room: &RoomData,
        min_distance: f32,
        rng: &mut R,
    ) -> f32 {
        let (lo, hi) = self.params.size_range_for(&room.biome);
        let mut scale = rng.range_f32(lo, hi)
            * self.params.room_scale_multiplier.max(MIN_SCALE_MULTIPLIER)
            * LayoutParams::size_multiplier(room.size);

        if min_distance > MIN_CAP_DISTANCE {
            scale = scale.min(min_distance * MAX_SCALE_OF_MIN_DISTANCE);
        }
        scale.max(MIN_ROOM_SCALE)
    }

    /// Scales for every room in order, capped by the closest pair in `positions`
    pub fn room_scales<R: DungeonRng + ?Sized>(
        &self,
        rooms: &[RoomData],
        positions: &[Vec2],
        rng: &mut R,
    ) -> Vec<f32> {
        let min_distance = min_room_distance(positions);
        rooms
            .iter()
            .map(|room| self.room_scale(room, min_distance, rng))
            .collect()
    }

    /// Push overlapping rooms apart until no pair overlaps or the budget runs out
    ///
    /// Mismatched slice lengths and fewer than two rooms are left untouched.
    pub fn resolve_overlaps<R: DungeonRng + ?Sized>(
        &self,
        positions: &mut [Vec2],
        scales: &[f32],
        rng: &mut R,
    ) -> RelaxationStats {
        let count = positions.len();
        if count <= 1 || count != scales.len() {
            return RelaxationStats {
                passes: 0,
                converged: true,
            };
        }

        let budget = self.iteration_budget();
        for pass in 1..=budget {
            let mut moved = false;
            for i in 0..count {
                for j in (i + 1)..count {
                    let delta = positions[j] - positions[i];
                    let dist = delta.length();
                    let min_dist = self.required_separation(scales[i], scales[j]);
                    if dist >= min_dist {
                        continue;
                    }

                    let dir = if dist > COINCIDENT_DISTANCE {
                        delta / dist
                    } else {
                        rng.unit_direction()
                    };
                    let push = dir * ((min_dist - dist) * 0.5);
                    positions[i] -= push;
                    positions[j] += push;
                    moved = true;
                }
            }

            if !moved {
                return RelaxationStats {
                    passes: pass,
                    converged: true,
                };
            }
        }

        log::debug!(
            "Overlap relaxation used its full budget of {} passes",
            budget
        );
        RelaxationStats {
            passes: budget,
            converged: false,
        }
    }

    /// Pairs still closer than their required separation (minus `tolerance`)
    pub fn overlapping_pairs(
        &self,
        positions: &[Vec2],
        scales: &[f32],
        tolerance: f32,
    ) -> Vec<(usize, usize)> {
        let count = positions.len().min(scales.len());
        let mut pairs = Vec::new();
        for i in 0..count {
            for j in (i + 1)..count {
                let dist = positions[i].distance(positions[j]);
                if dist < self.required_separation(scales[i], scales[j]) - tolerance {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

/// Closest distance between any two positions (0.0 for fewer than two)
pub fn min_room_distance(positions: &[Vec2]) -> f32 {
    let mut min_sq = f32::INFINITY;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            min_sq = min_sq.min(a.distance_squared(*b));
        }
    }

    if min_sq.is_finite() { min_sq.sqrt() } else { 0.0 }
}
