//! Terrain generation parameters, loadable from TOML.

use std::error::Error;
use std::fs;
use std::path::Path;

use loam_blocks::{BlockId, BlockRegistry};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct WorldGenConfig {
    #[serde(default = "default_block_size")]
    pub block_size: f32,
    /// Water plane in world units; columns at or below it get the
    /// underwater surface block.
    #[serde(default = "default_sea_level")]
    pub sea_level: f32,
    /// Spline slope above which the whole column becomes stone.
    #[serde(default = "default_slope_stone_threshold")]
    pub slope_stone_threshold: f32,
    /// Peak terrain height in world units before block-size scaling.
    #[serde(default = "default_height_amplitude")]
    pub height_amplitude: f32,
    #[serde(default = "default_noise_layers")]
    pub noise: [NoiseLayer; 3],
    #[serde(default = "default_spline_points")]
    pub spline: Vec<[f32; 2]>,
    #[serde(default)]
    pub surface: SurfaceConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            sea_level: default_sea_level(),
            slope_stone_threshold: default_slope_stone_threshold(),
            height_amplitude: default_height_amplitude(),
            noise: default_noise_layers(),
            spline: default_spline_points(),
            surface: SurfaceConfig::default(),
        }
    }
}

impl WorldGenConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: WorldGenConfig = toml::from_str(&text)?;
        Ok(cfg)
    }
}

fn default_block_size() -> f32 {
    0.25
}
fn default_sea_level() -> f32 {
    20.0
}
fn default_slope_stone_threshold() -> f32 {
    1.0
}
fn default_height_amplitude() -> f32 {
    100.0
}

fn default_spline_points() -> Vec<[f32; 2]> {
    vec![
        [0.0, 0.05],
        [3.0, 0.12],
        [5.0, 0.25],
        [7.0, 0.55],
        [9.0, 0.75],
        [11.8, 1.0],
    ]
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    Perlin,
    Simplex,
}

/// One octave of the continentalness blend. `frequency` is cycles per
/// world unit, `expansion` stretches the unit noise band, and `weight`
/// scales its share of the sum.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct NoiseLayer {
    pub kind: NoiseKind,
    pub frequency: f32,
    pub expansion: f32,
    pub weight: f32,
}

fn default_noise_layers() -> [NoiseLayer; 3] {
    [
        NoiseLayer {
            kind: NoiseKind::Perlin,
            frequency: 0.075 / 16.0,
            expansion: 10.0,
            weight: 0.75,
        },
        NoiseLayer {
            kind: NoiseKind::Simplex,
            frequency: 0.1 / 16.0,
            expansion: 8.0,
            weight: 0.5,
        },
        NoiseLayer {
            kind: NoiseKind::Simplex,
            frequency: 1.0 / 16.0,
            expansion: 2.0,
            weight: 0.15,
        },
    ]
}

#[derive(Clone, Debug, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "default_main_block")]
    pub main: String,
    #[serde(default = "default_dirt_block")]
    pub dirt: String,
    #[serde(default = "default_stone_block")]
    pub stone: String,
    #[serde(default = "default_underwater_block")]
    pub underwater: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            main: default_main_block(),
            dirt: default_dirt_block(),
            stone: default_stone_block(),
            underwater: default_underwater_block(),
        }
    }
}

fn default_main_block() -> String {
    "grass".into()
}
fn default_dirt_block() -> String {
    "dirt".into()
}
fn default_stone_block() -> String {
    "stone".into()
}
fn default_underwater_block() -> String {
    "sand".into()
}

/// Surface block names resolved to registry ids once, before generation
/// jobs start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceBlocks {
    pub main: BlockId,
    pub dirt: BlockId,
    pub stone: BlockId,
    pub underwater: BlockId,
}

impl SurfaceConfig {
    pub fn resolve(&self, reg: &BlockRegistry) -> Result<SurfaceBlocks, Box<dyn Error>> {
        let lookup = |name: &str| {
            reg.id_by_name(name)
                .ok_or_else(|| format!("surface block {name:?} missing from palette"))
        };
        Ok(SurfaceBlocks {
            main: lookup(&self.main)?,
            dirt: lookup(&self.dirt)?,
            stone: lookup(&self.stone)?,
            underwater: lookup(&self.underwater)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: WorldGenConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.block_size, 0.25);
        assert_eq!(cfg.sea_level, 20.0);
        assert_eq!(cfg.noise[0].expansion, 10.0);
        assert_eq!(cfg.surface.main, "grass");
    }

    #[test]
    fn overrides_apply() {
        let cfg: WorldGenConfig = toml::from_str(
            r#"
            sea_level = 12.5
            [surface]
            underwater = "gravel"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sea_level, 12.5);
        assert_eq!(cfg.surface.underwater, "gravel");
        assert_eq!(cfg.surface.stone, "stone");
    }

    #[test]
    fn resolve_rejects_unknown_names() {
        let reg = BlockRegistry::default_palette();
        let mut cfg = SurfaceConfig::default();
        cfg.main = "marble".into();
        assert!(cfg.resolve(&reg).is_err());
    }

    #[test]
    fn resolve_maps_default_palette() {
        let reg = BlockRegistry::default_palette();
        let blocks = SurfaceConfig::default().resolve(&reg).unwrap();
        assert_eq!(Some(blocks.main), reg.id_by_name("grass"));
        assert_eq!(Some(blocks.underwater), reg.id_by_name("sand"));
    }
}
