use loam_geom::{Aabb, Vec3};
use loam_world::ChunkCoord;

use crate::mesh_build::MeshBuild;

/// CPU-side mesh for one chunk. `mesh` positions are chunk-local; `bbox`
/// places the chunk in world space.
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub mesh: MeshBuild,
}

impl ChunkMeshCpu {
    pub fn new(
        coord: ChunkCoord,
        dims: (usize, usize, usize),
        block_size: f32,
        mesh: MeshBuild,
    ) -> Self {
        let (sx, sy, sz) = dims;
        let min = Vec3::new(
            coord.cx as f32 * sx as f32 * block_size,
            coord.cy as f32 * sy as f32 * block_size,
            coord.cz as f32 * sz as f32 * block_size,
        );
        let max = min
            + Vec3::new(
                sx as f32 * block_size,
                sy as f32 * block_size,
                sz as f32 * block_size,
            );
        Self {
            coord,
            bbox: Aabb::new(min, max),
            mesh,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}
