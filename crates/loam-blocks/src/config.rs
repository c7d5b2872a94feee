//! Serde layer for the block palette TOML.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct PaletteConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDefCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlockDefCfg {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: [u8; 4],
}

fn default_color() -> [u8; 4] {
    [255, 0, 255, 255]
}
