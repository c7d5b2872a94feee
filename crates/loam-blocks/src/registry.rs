use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use crate::config::PaletteConfig;

/// Runtime block identifier as stored in voxel grids. `0` is reserved for
/// air; every id `>= 1` indexes the palette at `id - 1`.
pub type BlockId = u8;

pub const AIR: BlockId = 0;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDef {
    pub name: String,
    pub color: [u8; 4],
}

#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    defs: Vec<BlockDef>,
    by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn from_defs(defs: Vec<BlockDef>) -> Self {
        assert!(
            defs.len() < BlockId::MAX as usize,
            "palette exceeds the {} non-air block ids",
            BlockId::MAX as usize - 1
        );
        let mut by_name = HashMap::new();
        for (i, def) in defs.iter().enumerate() {
            by_name.insert(def.name.clone(), (i + 1) as BlockId);
        }
        Self { defs, by_name }
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let cfg: PaletteConfig = toml::from_str(&text)?;
        let defs = cfg
            .blocks
            .into_iter()
            .map(|b| BlockDef {
                name: b.name,
                color: b.color,
            })
            .collect();
        Ok(Self::from_defs(defs))
    }

    /// The four surface blocks the terrain generator places.
    pub fn default_palette() -> Self {
        Self::from_defs(vec![
            BlockDef {
                name: "grass".into(),
                color: [96, 160, 62, 255],
            },
            BlockDef {
                name: "dirt".into(),
                color: [121, 85, 58, 255],
            },
            BlockDef {
                name: "stone".into(),
                color: [128, 128, 128, 255],
            },
            BlockDef {
                name: "sand".into(),
                color: [216, 204, 158, 255],
            },
        ])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        if id == AIR {
            return None;
        }
        self.defs.get(id as usize - 1)
    }

    /// Vertex color for a non-air block id. Air has no palette entry and
    /// must never reach here.
    #[inline]
    pub fn color_of(&self, id: BlockId) -> [u8; 4] {
        debug_assert!(id != AIR, "air has no palette color");
        self.defs[id as usize - 1].color
    }
}
