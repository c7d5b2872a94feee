//! Application configuration, loadable from TOML.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use loam_world::WorldGenConfig;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    /// Chunk dimensions in voxels.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: [usize; 3],
    /// Horizontal streaming radius in chunks.
    #[serde(default = "default_radius")]
    pub radius: i32,
    /// Vertical chunk stack requested per column.
    #[serde(default = "default_chunks_y")]
    pub chunks_y: usize,
    /// Background worker count; bounds concurrent jobs.
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Seed text. Blank draws a random seed.
    #[serde(default)]
    pub seed: String,
    /// Optional block palette TOML; the built-in palette is used when
    /// absent.
    #[serde(default)]
    pub palette: Option<PathBuf>,
    #[serde(default)]
    pub worldgen: WorldGenConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            radius: default_radius(),
            chunks_y: default_chunks_y(),
            workers: default_workers(),
            seed: String::new(),
            palette: None,
            worldgen: WorldGenConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: AppConfig = toml::from_str(&text)?;
        for (i, dim) in cfg.chunk_size.iter().enumerate() {
            if *dim == 0 {
                return Err(format!("chunk_size[{i}] must be positive").into());
            }
        }
        Ok(cfg)
    }
}

fn default_chunk_size() -> [usize; 3] {
    [64, 64, 64]
}
fn default_radius() -> i32 {
    4
}
fn default_chunks_y() -> usize {
    2
}
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.chunk_size, [64, 64, 64]);
        assert!(cfg.workers >= 1);
        assert!(cfg.seed.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let cfg: AppConfig = toml::from_str(
            r#"
            radius = 2
            seed = "glacier"
            [worldgen]
            sea_level = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.radius, 2);
        assert_eq!(cfg.seed, "glacier");
        assert_eq!(cfg.worldgen.sea_level, 10.0);
        assert_eq!(cfg.chunks_y, 2);
    }
}
