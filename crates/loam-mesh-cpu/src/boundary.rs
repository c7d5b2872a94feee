//! Copied one-voxel border planes from neighboring chunks.
//!
//! Mesh jobs run off-thread, so they never chase live neighbor buffers.
//! The planes are snapshotted on the scheduling thread and travel with
//! the job.

use loam_blocks::BlockId;
use loam_chunk::ChunkBuf;

use crate::face::{ALL_FACES, Face};

/// Border planes indexed by [`Face`]. A `None` entry means the neighbor
/// on that side had no voxel data when the job was scheduled.
///
/// Plane layouts:
/// - `PosX`/`NegX`: `z + sz * y`
/// - `PosY`/`NegY`: `x + sx * z`
/// - `PosZ`/`NegZ`: `x + sx * y`
#[derive(Clone, Debug, Default)]
pub struct BoundarySlices {
    planes: [Option<Box<[BlockId]>>; 6],
}

impl BoundarySlices {
    /// Snapshots the facing plane of each present neighbor. Neighbors are
    /// indexed by `Face::index()` of the direction from the center chunk.
    pub fn gather(neighbors: [Option<&ChunkBuf>; 6]) -> Self {
        let mut planes: [Option<Box<[BlockId]>>; 6] = Default::default();
        for face in ALL_FACES {
            let Some(n) = neighbors[face.index()] else {
                continue;
            };
            let (sx, sy, sz) = (n.sx, n.sy, n.sz);
            let plane = match face {
                Face::PosX | Face::NegX => {
                    let x = if face == Face::PosX { 0 } else { sx - 1 };
                    let mut p = vec![0u8; sz * sy];
                    for y in 0..sy {
                        for z in 0..sz {
                            p[z + sz * y] = n.get_local(x, y, z);
                        }
                    }
                    p
                }
                Face::PosY | Face::NegY => {
                    let y = if face == Face::PosY { 0 } else { sy - 1 };
                    let mut p = vec![0u8; sx * sz];
                    for z in 0..sz {
                        for x in 0..sx {
                            p[x + sx * z] = n.get_local(x, y, z);
                        }
                    }
                    p
                }
                Face::PosZ | Face::NegZ => {
                    let z = if face == Face::PosZ { 0 } else { sz - 1 };
                    let mut p = vec![0u8; sx * sy];
                    for y in 0..sy {
                        for x in 0..sx {
                            p[x + sx * y] = n.get_local(x, y, z);
                        }
                    }
                    p
                }
            };
            planes[face.index()] = Some(plane.into_boxed_slice());
        }
        Self { planes }
    }

    #[inline]
    pub fn plane(&self, face: Face) -> Option<&[BlockId]> {
        self.planes[face.index()].as_deref()
    }
}
