//! Chunk voxel buffer and terrain population.
#![forbid(unsafe_code)]

use loam_blocks::{AIR, BlockId};
use loam_world::{ChunkCoord, SurfaceBlocks, World};

/// Dense voxel grid for one chunk. Rows are laid out x-fastest, then z,
/// then y, so a whole column walk touches one stride per row.
#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub voxels: Vec<BlockId>,
}

impl ChunkBuf {
    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.voxels[self.idx(x, y, z)]
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let base_x = self.coord.cx * self.sx as i32;
        let base_y = self.coord.cy * self.sy as i32;
        let base_z = self.coord.cz * self.sz as i32;
        wx >= base_x
            && wx < base_x + self.sx as i32
            && wy >= base_y
            && wy < base_y + self.sy as i32
            && wz >= base_z
            && wz < base_z + self.sz as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<BlockId> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let base_x = self.coord.cx * self.sx as i32;
        let base_y = self.coord.cy * self.sy as i32;
        let base_z = self.coord.cz * self.sz as i32;
        Some(self.get_local(
            (wx - base_x) as usize,
            (wy - base_y) as usize,
            (wz - base_z) as usize,
        ))
    }

    pub fn from_voxels_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        voxels: Vec<BlockId>,
    ) -> Self {
        let mut v = voxels;
        v.resize(sx * sy * sz, AIR);
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            voxels: v,
        }
    }

    #[inline]
    pub fn has_non_air(&self) -> bool {
        self.voxels.iter().any(|id| *id != AIR)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        !self.has_non_air()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkOccupancy {
    Empty,
    Populated,
}

impl ChunkOccupancy {
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, ChunkOccupancy::Empty)
    }

    #[inline]
    pub fn has_blocks(self) -> bool {
        matches!(self, ChunkOccupancy::Populated)
    }
}

#[derive(Clone, Debug)]
pub struct ChunkGenerateResult {
    pub buf: ChunkBuf,
    pub occupancy: ChunkOccupancy,
}

/// Populates one chunk from the world's height field.
///
/// Per column: the surface row is `ceil(height) - 1`; steep columns are
/// solid stone, columns at or below sea level get the underwater block,
/// the surface row gets the main block, and everything under it is dirt.
pub fn generate_chunk_buffer(
    world: &World,
    coord: ChunkCoord,
    surface: SurfaceBlocks,
) -> ChunkGenerateResult {
    let sx = world.chunk_size_x;
    let sy = world.chunk_size_y;
    let sz = world.chunk_size_z;
    let mut voxels = vec![AIR; sx * sy * sz];
    let base_x = coord.cx * sx as i32;
    let base_y = coord.cy * sy as i32;
    let base_z = coord.cz * sz as i32;
    let sea_rows = world.sea_level_voxels();
    let mut has_blocks = false;
    for z in 0..sz {
        for x in 0..sx {
            let wx = base_x + x as i32;
            let wz = base_z + z as i32;
            let (height, slope) = world.height_and_slope(wx as f32, wz as f32);
            let col_h = height.ceil() as i32;
            for y in 0..sy {
                let wy = base_y + y as i32;
                if wy >= col_h {
                    break;
                }
                let id = if slope > world.slope_stone_threshold {
                    surface.stone
                } else if (wy as f32) <= sea_rows {
                    surface.underwater
                } else if wy == col_h - 1 {
                    surface.main
                } else {
                    surface.dirt
                };
                voxels[(y * sz + z) * sx + x] = id;
                has_blocks = true;
            }
        }
    }
    ChunkGenerateResult {
        buf: ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            voxels,
        },
        occupancy: if has_blocks {
            ChunkOccupancy::Populated
        } else {
            ChunkOccupancy::Empty
        },
    }
}
