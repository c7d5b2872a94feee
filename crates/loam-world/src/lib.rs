//! World sizing, terrain sampling, and generation parameters.
#![forbid(unsafe_code)]

pub mod spline;
pub mod worldgen;

mod chunk_coord;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use fastnoise_lite::{FastNoiseLite, NoiseType};

pub use chunk_coord::ChunkCoord;
pub use spline::HeightSpline;
pub use worldgen::{SurfaceBlocks, WorldGenConfig};

use worldgen::{NoiseKind, NoiseLayer};

/// Terrain column sampler. Returns `(height, slope)` where `height` is the
/// surface elevation in voxel rows and `slope` is the spline gradient used
/// for the stone cutoff.
pub trait HeightField: Send + Sync {
    fn height_and_slope(&self, wx: f32, wz: f32) -> (f32, f32);
}

impl<F> HeightField for F
where
    F: Fn(f32, f32) -> (f32, f32) + Send + Sync,
{
    fn height_and_slope(&self, wx: f32, wz: f32) -> (f32, f32) {
        self(wx, wz)
    }
}

pub struct World {
    pub chunk_size_x: usize,
    pub chunk_size_y: usize,
    pub chunk_size_z: usize,
    pub block_size: f32,
    pub sea_level: f32,
    pub slope_stone_threshold: f32,
    pub seed: i32,
    height: Arc<dyn HeightField>,
}

impl World {
    pub fn new(
        chunk_size_x: usize,
        chunk_size_y: usize,
        chunk_size_z: usize,
        seed: i32,
        cfg: &WorldGenConfig,
    ) -> Self {
        let field = ContinentalnessField::new(seed, cfg);
        Self::with_height_field(chunk_size_x, chunk_size_y, chunk_size_z, seed, cfg, Arc::new(field))
    }

    /// Constructor for callers that bring their own sampler, typically
    /// tests pinning exact column heights.
    pub fn with_height_field(
        chunk_size_x: usize,
        chunk_size_y: usize,
        chunk_size_z: usize,
        seed: i32,
        cfg: &WorldGenConfig,
        height: Arc<dyn HeightField>,
    ) -> Self {
        assert!(
            chunk_size_x > 0 && chunk_size_y > 0 && chunk_size_z > 0,
            "chunk dimensions must be positive"
        );
        assert!(cfg.block_size > 0.0, "block size must be positive");
        Self {
            chunk_size_x,
            chunk_size_y,
            chunk_size_z,
            block_size: cfg.block_size,
            sea_level: cfg.sea_level,
            slope_stone_threshold: cfg.slope_stone_threshold,
            seed,
            height,
        }
    }

    #[inline]
    pub fn height_and_slope(&self, wx: f32, wz: f32) -> (f32, f32) {
        self.height.height_and_slope(wx, wz)
    }

    /// Sea level expressed in voxel rows.
    #[inline]
    pub fn sea_level_voxels(&self) -> f32 {
        self.sea_level / self.block_size
    }
}

/// Three-octave continentalness blend driving the height spline, the
/// classic low/mid/high split with fixed weights.
pub struct ContinentalnessField {
    layers: [(FastNoiseLite, NoiseLayer); 3],
    spline: HeightSpline,
    height_scale: f32,
}

impl ContinentalnessField {
    pub fn new(seed: i32, cfg: &WorldGenConfig) -> Self {
        let salts: [i32; 3] = [0x51ab_13e7, 0x2c3d_9f01u32 as i32, 0x7b61_44c5];
        let mut layers = Vec::with_capacity(3);
        for (layer, salt) in cfg.noise.iter().zip(salts) {
            let mut noise = FastNoiseLite::with_seed(seed ^ salt);
            noise.set_noise_type(Some(match layer.kind {
                NoiseKind::Perlin => NoiseType::Perlin,
                NoiseKind::Simplex => NoiseType::OpenSimplex2,
            }));
            noise.set_frequency(Some(layer.frequency));
            layers.push((noise, *layer));
        }
        let points: Vec<(f32, f32)> = cfg.spline.iter().map(|p| (p[0], p[1])).collect();
        Self {
            layers: layers.try_into().map_err(|_| ()).expect("three noise layers"),
            spline: HeightSpline::from_points(&points),
            height_scale: cfg.height_amplitude / cfg.block_size,
        }
    }

    pub fn continentalness(&self, wx: f32, wz: f32) -> f32 {
        let mut combined = 0.0;
        for (noise, layer) in &self.layers {
            let unit = (noise.get_noise_2d(wx, wz) + 1.0) / 2.0;
            combined += unit * layer.expansion * layer.weight;
        }
        combined
    }
}

impl HeightField for ContinentalnessField {
    fn height_and_slope(&self, wx: f32, wz: f32) -> (f32, f32) {
        let c = self.continentalness(wx, wz);
        let height = self.spline.evaluate(c, self.height_scale);
        let slope = self.spline.slope_at(c);
        (height, slope)
    }
}

/// Parses a seed string: decimal integers pass through, anything else is
/// hashed, and a blank string draws a fresh seed from the clock.
pub fn parse_seed(input: &str) -> i32 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
            .unwrap_or(0);
        let mut h = DefaultHasher::new();
        nanos.hash(&mut h);
        return h.finish() as i32;
    }
    if let Ok(n) = trimmed.parse::<i32>() {
        return n;
    }
    let mut h = DefaultHasher::new();
    trimmed.hash(&mut h);
    h.finish() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_seed_parses_directly() {
        assert_eq!(parse_seed("42"), 42);
        assert_eq!(parse_seed("  -7 "), -7);
    }

    #[test]
    fn text_seed_hashes_deterministically() {
        assert_eq!(parse_seed("glacier"), parse_seed("glacier"));
        assert_ne!(parse_seed("glacier"), parse_seed("dune"));
    }

    #[test]
    fn continentalness_is_deterministic_per_seed() {
        let cfg = WorldGenConfig::default();
        let a = ContinentalnessField::new(1234, &cfg);
        let b = ContinentalnessField::new(1234, &cfg);
        let c = ContinentalnessField::new(4321, &cfg);
        let pa = a.height_and_slope(17.0, -3.0);
        assert_eq!(pa, b.height_and_slope(17.0, -3.0));
        assert_ne!(pa, c.height_and_slope(17.0, -3.0));
    }

    #[test]
    fn continentalness_stays_in_blend_range() {
        let cfg = WorldGenConfig::default();
        let field = ContinentalnessField::new(99, &cfg);
        // max = 10*0.75 + 8*0.5 + 2*0.15
        for i in 0..200 {
            let c = field.continentalness(i as f32 * 3.7, i as f32 * -1.3);
            assert!((0.0..=11.8).contains(&c), "c = {c}");
        }
    }

    #[test]
    fn world_reports_sea_level_in_voxels() {
        let cfg = WorldGenConfig::default();
        let w = World::new(64, 64, 64, 7, &cfg);
        assert_eq!(w.sea_level_voxels(), 80.0);
    }
}
