//! Streaming: which chunks should exist around the viewer, and one tick
//! of the lifecycle loop.

use loam_mesh_cpu::ChunkMeshCpu;
use loam_world::ChunkCoord;

use crate::store::{PumpStats, WorldState};

/// Requests a square of chunk columns around a center and drives the
/// generate/mesh cycle each tick.
pub struct StreamingController {
    radius: i32,
    chunks_y: i32,
    center: Option<ChunkCoord>,
}

impl StreamingController {
    pub fn new(radius: i32, chunks_y: usize) -> Self {
        Self {
            radius: radius.max(0),
            chunks_y: (chunks_y.max(1)) as i32,
            center: None,
        }
    }

    /// Requests every chunk column within `radius` of `center`. Already
    /// requested chunks are left alone, so recentering only schedules
    /// the newly uncovered ring.
    pub fn set_center(&mut self, state: &WorldState, center: ChunkCoord) {
        if self.center == Some(center) {
            return;
        }
        self.center = Some(center);
        let mut wanted = Vec::new();
        for cz in (center.cz - self.radius)..=(center.cz + self.radius) {
            for cx in (center.cx - self.radius)..=(center.cx + self.radius) {
                for cy in 0..self.chunks_y {
                    wanted.push(ChunkCoord::new(cx, cy, cz));
                }
            }
        }
        // Closest chunks enter the FIFO first, so terrain fills in
        // outward from the viewer.
        wanted.sort_by_key(|c| c.distance_sq(center));
        let mut requested = 0usize;
        for coord in wanted {
            if state.request_chunk(coord) {
                requested += 1;
            }
        }
        if requested > 0 {
            log::info!(
                "streaming center ({},{},{}): requested {} chunks",
                center.cx,
                center.cy,
                center.cz,
                requested
            );
        }
    }

    pub fn center(&self) -> Option<ChunkCoord> {
        self.center
    }

    /// One lifecycle tick: apply finished jobs, then turn the drained
    /// dirty set into mesh jobs.
    pub fn tick(
        &mut self,
        state: &WorldState,
        on_mesh: impl FnMut(ChunkCoord, &ChunkMeshCpu),
    ) -> PumpStats {
        let stats = state.pump(on_mesh);
        for coord in state.drain_dirty() {
            state.remesh(coord);
        }
        stats
    }
}
