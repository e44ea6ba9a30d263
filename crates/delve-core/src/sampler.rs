//! Room position sampling
//!
//! Scatters a candidate pool over a square area, scores each candidate with
//! fractal noise plus a little jitter, then greedily keeps the best-scoring
//! candidates that respect the minimum spacing. The noise field clusters rooms
//! into organic blobs instead of a uniform sprinkle.

use fastnoise_lite::{FastNoiseLite, FractalType, NoiseType};
use glam::Vec2;

use crate::dungeon_config::NoiseParams;
use crate::rng_trait::DungeonRng;

/// Smallest side of the sampling area
const MIN_AREA: f32 = 4.0;
/// Extra candidates beyond the room count when the multiplier is small
const MIN_EXTRA_CANDIDATES: usize = 8;
/// Spacing floor so tiny configs still spread rooms out
const MIN_SPACING_FLOOR: f32 = 0.5;
/// Magnitude of the random noise-domain offset
const NOISE_OFFSET_RADIUS: f32 = 1000.0;

/// A scored position candidate
#[derive(Debug, Clone, Copy)]
struct Candidate {
    pos: Vec2,
    score: f32,
}

/// Noise-scored room position sampler
pub struct PositionSampler {
    params: NoiseParams,
    // Single-octave Perlin; octaves are summed in `fractal_noise`
    noise: FastNoiseLite,
}

impl PositionSampler {
    pub fn new(params: &NoiseParams) -> Self {
        let mut noise = FastNoiseLite::with_seed(params.seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_fractal_type(Some(FractalType::None));
        noise.set_frequency(Some(1.0));

        Self {
            params: params.clone(),
            noise,
        }
    }

    /// Side length of the square sampling area for `count` rooms
    pub fn area_size(&self, count: usize) -> f32 {
        (self.params.room_spacing * count as f32).max(MIN_AREA)
    }

    /// Number of candidates scored for `count` rooms
    pub fn candidate_count(&self, count: usize) -> usize {
        count
            .saturating_mul(self.params.candidate_multiplier)
            .max(count.saturating_add(MIN_EXTRA_CANDIDATES))
    }

    /// Effective minimum distance between accepted rooms
    pub fn min_spacing(&self) -> f32 {
        self.params.min_spacing.max(MIN_SPACING_FLOOR)
    }

    /// Fractal noise in [0, 1], normalized by the maximum possible octave sum
    pub fn fractal_noise(&self, x: f32, y: f32) -> f32 {
        let octaves = self.params.octaves.max(1);
        let lacunarity = self.params.lacunarity.max(1.0);
        let gain = self.params.gain.clamp(0.0, 1.0);

        let mut amplitude = 0.5;
        let mut frequency = 1.0;
        let mut sum = 0.0;
        let mut max = 0.0;
        for _ in 0..octaves {
            sum += self.perlin01(x * frequency, y * frequency) * amplitude;
            max += amplitude;
            frequency *= lacunarity;
            amplitude *= gain;
        }

        if max > 0.0 { sum / max } else { sum }
    }

    /// Perlin noise remapped from [-1, 1] to [0, 1]
    fn perlin01(&self, x: f32, y: f32) -> f32 {
        (self.noise.get_noise_2d(x, y) * 0.5 + 0.5).clamp(0.0, 1.0)
    }

    /// Sample exactly `count` positions centered on the origin
    ///
    /// When the candidate pool runs out before `count` rooms satisfy the
    /// spacing, the remainder is placed uniformly at random without any
    /// spacing constraint.
    pub fn sample<R: DungeonRng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec2> {
        if count == 0 {
            return Vec::new();
        }

        let half = self.area_size(count) * 0.5;
        let noise_offset = rng.inside_unit_circle() * NOISE_OFFSET_RADIUS;
        let scale = self.params.scale;
        let jitter = self.params.jitter;

        let candidate_count = self.candidate_count(count);
        let mut candidates = Vec::with_capacity(candidate_count);
        for _ in 0..candidate_count {
            let u = rng.gen_f32();
            let v = rng.gen_f32();
            let pos = Vec2::new(lerp(-half, half, u), lerp(-half, half, v));
            let n = self.fractal_noise(
                (pos.x + noise_offset.x) * scale,
                (pos.y + noise_offset.y) * scale,
            );
            let score = n + rng.range_f32(-jitter, jitter) * 0.1;
            candidates.push(Candidate { pos, score });
        }

        // Stable: equal scores keep generation order
        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let min_spacing = self.min_spacing();
        let mut picked: Vec<Vec2> = Vec::with_capacity(count);
        for candidate in &candidates {
            if picked.len() >= count {
                break;
            }
            if is_far_enough(candidate.pos, &picked, min_spacing) {
                picked.push(candidate.pos);
            }
        }

        let spaced = picked.len();
        while picked.len() < count {
            picked.push(Vec2::new(
                rng.range_f32(-half, half),
                rng.range_f32(-half, half),
            ));
        }

        if spaced < count {
            log::debug!(
                "Sampler placed {} of {} rooms without spacing ({} candidates exhausted)",
                count - spaced,
                count,
                candidate_count
            );
        }

        picked
    }
}

/// Check that `candidate` keeps at least `min_distance` from every point
pub fn is_far_enough(candidate: Vec2, positions: &[Vec2], min_distance: f32) -> bool {
    let min_sq = min_distance * min_distance;
    positions
        .iter()
        .all(|p| p.distance_squared(candidate) >= min_sq)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
