//! Chunk store, lifecycle flags, and the dirty set.
//!
//! One `Chunk` entry exists per requested coordinate from the moment it
//! is requested. Voxel data arrives later from a worker; the atomic
//! flags track where the chunk is in the generate/mesh cycle so stale
//! or duplicate work is rejected instead of queued twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, RwLock};

use hashbrown::{HashMap, HashSet};
use loam_blocks::BlockRegistry;
use loam_chunk::ChunkBuf;
use loam_mesh_cpu::{ALL_FACES, BoundarySlices, ChunkMeshCpu, combine_builds};
use loam_runtime::{JobOut, MeshJob, Runtime};
use loam_world::{ChunkCoord, SurfaceBlocks, World};

pub struct Chunk {
    pub coord: ChunkCoord,
    buf: OnceLock<Arc<ChunkBuf>>,
    generated: AtomicBool,
    contains_voxel: AtomicBool,
    dirty: AtomicBool,
    meshing: AtomicBool,
    meshed_once: AtomicBool,
}

pub type ChunkHandle = Arc<Chunk>;

impl Chunk {
    fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            buf: OnceLock::new(),
            generated: AtomicBool::new(false),
            contains_voxel: AtomicBool::new(false),
            dirty: AtomicBool::new(false),
            meshing: AtomicBool::new(false),
            meshed_once: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_generated(&self) -> bool {
        self.generated.load(Ordering::Acquire)
    }

    #[inline]
    pub fn has_voxels(&self) -> bool {
        self.contains_voxel.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_meshing(&self) -> bool {
        self.meshing.load(Ordering::Acquire)
    }

    #[inline]
    pub fn has_meshed_once(&self) -> bool {
        self.meshed_once.load(Ordering::Acquire)
    }

    #[inline]
    pub fn buf(&self) -> Option<&Arc<ChunkBuf>> {
        self.buf.get()
    }

    fn install_buf(&self, buf: Arc<ChunkBuf>, has_voxels: bool) {
        let _ = self.buf.set(buf);
        self.contains_voxel.store(has_voxels, Ordering::Release);
        self.generated.store(true, Ordering::Release);
    }

    /// Claims the meshing slot. Returns false if a mesh is already in
    /// flight for this chunk.
    fn begin_meshing(&self) -> bool {
        !self.meshing.swap(true, Ordering::AcqRel)
    }
}

#[derive(Default, Debug, Clone, Copy)]
pub struct PumpStats {
    pub generated: usize,
    pub meshed: usize,
}

pub struct WorldState {
    pub world: Arc<World>,
    pub reg: Arc<BlockRegistry>,
    pub runtime: Runtime,
    chunks: RwLock<HashMap<ChunkCoord, ChunkHandle>>,
    dirty: Mutex<HashSet<ChunkCoord>>,
}

impl WorldState {
    pub fn new(
        world: Arc<World>,
        reg: Arc<BlockRegistry>,
        surface: SurfaceBlocks,
        workers: usize,
    ) -> Self {
        let runtime = Runtime::new(world.clone(), reg.clone(), surface, workers);
        Self {
            world,
            reg,
            runtime,
            chunks: RwLock::new(HashMap::new()),
            dirty: Mutex::new(HashSet::new()),
        }
    }

    /// Ensures a chunk exists at `coord` and schedules its generation.
    /// Returns false when the chunk was already requested; the first
    /// request wins and later ones change nothing.
    pub fn request_chunk(&self, coord: ChunkCoord) -> bool {
        let inserted = match self.chunks.write() {
            Ok(mut chunks) => {
                if chunks.contains_key(&coord) {
                    false
                } else {
                    chunks.insert(coord, Arc::new(Chunk::new(coord)));
                    true
                }
            }
            Err(_) => false,
        };
        if inserted {
            self.runtime.submit_generate(coord);
        }
        inserted
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<ChunkHandle> {
        self.chunks
            .read()
            .ok()
            .and_then(|chunks| chunks.get(&coord).cloned())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.read().map(|c| c.len()).unwrap_or(0)
    }

    /// Neighbor handles indexed by `Face::index()`.
    pub fn adjacent(&self, coord: ChunkCoord) -> [Option<ChunkHandle>; 6] {
        ALL_FACES.map(|face| {
            let (dx, dy, dz) = face.delta();
            self.get(coord.offset(dx, dy, dz))
        })
    }

    /// Flags a chunk for remeshing. Unknown coordinates are ignored.
    pub fn mark_dirty(&self, coord: ChunkCoord) {
        let Some(chunk) = self.get(coord) else {
            return;
        };
        chunk.dirty.store(true, Ordering::Release);
        if let Ok(mut dirty) = self.dirty.lock() {
            dirty.insert(coord);
        }
    }

    /// Takes the current dirty coordinates, leaving the set empty.
    pub fn drain_dirty(&self) -> Vec<ChunkCoord> {
        match self.dirty.lock() {
            Ok(mut dirty) => dirty.drain().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn dirty_len(&self) -> usize {
        self.dirty.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Schedules a mesh rebuild for `coord` if the chunk is dirty,
    /// generated, non-empty, and not already meshing. A rejected request
    /// leaves every flag untouched.
    pub fn remesh(&self, coord: ChunkCoord) -> bool {
        let Some(chunk) = self.get(coord) else {
            return false;
        };
        if !chunk.is_dirty() || !chunk.is_generated() || !chunk.has_voxels() {
            return false;
        }
        let Some(buf) = chunk.buf().cloned() else {
            return false;
        };
        if !chunk.begin_meshing() {
            return false;
        }
        chunk.dirty.store(false, Ordering::Release);

        // Border planes are snapshotted here so the job never reads
        // neighbor state that changes while it runs.
        let neighbors = self.adjacent(coord);
        let neighbor_bufs: [Option<Arc<ChunkBuf>>; 6] = neighbors
            .map(|n| n.filter(|c| c.is_generated()).and_then(|c| c.buf().cloned()));
        let refs: [Option<&ChunkBuf>; 6] = std::array::from_fn(|i| neighbor_bufs[i].as_deref());
        let borders = BoundarySlices::gather(refs);

        self.runtime.submit_mesh(MeshJob {
            coord,
            initial: !chunk.has_meshed_once(),
            buf,
            borders,
        });
        true
    }

    /// Applies finished worker results. Mesh outputs are handed to
    /// `on_mesh` in completion order.
    pub fn pump(&self, mut on_mesh: impl FnMut(ChunkCoord, &ChunkMeshCpu)) -> PumpStats {
        let mut stats = PumpStats::default();
        for out in self.runtime.drain_worker_results() {
            match out {
                JobOut::Generated {
                    coord,
                    buf,
                    occupancy,
                    t_gen_ms,
                } => {
                    let Some(chunk) = self.get(coord) else {
                        continue;
                    };
                    log::debug!(
                        "generated chunk ({},{},{}) occupancy={:?} in {}ms",
                        coord.cx,
                        coord.cy,
                        coord.cz,
                        occupancy,
                        t_gen_ms
                    );
                    chunk.install_buf(Arc::new(buf), occupancy.has_blocks());
                    stats.generated += 1;
                    if occupancy.has_blocks() {
                        self.mark_dirty(coord);
                        self.remesh(coord);
                    } else {
                        // An empty chunk's generation stands in for its
                        // initial mesh: neighbors can now resolve this
                        // side as open air.
                        self.mark_generated_neighbors_dirty(coord);
                    }
                }
                JobOut::Meshed {
                    coord,
                    initial,
                    parts,
                    t_mesh_ms,
                } => {
                    let Some(chunk) = self.get(coord) else {
                        continue;
                    };
                    let mesh = combine_builds(&parts);
                    log::debug!(
                        "meshed chunk ({},{},{}) quads={} in {}ms",
                        coord.cx,
                        coord.cy,
                        coord.cz,
                        mesh.quad_count(),
                        t_mesh_ms
                    );
                    let cpu = ChunkMeshCpu::new(
                        coord,
                        (
                            self.world.chunk_size_x,
                            self.world.chunk_size_y,
                            self.world.chunk_size_z,
                        ),
                        self.world.block_size,
                        mesh,
                    );
                    on_mesh(coord, &cpu);
                    chunk.meshing.store(false, Ordering::Release);
                    stats.meshed += 1;
                    if initial {
                        chunk.meshed_once.store(true, Ordering::Release);
                        self.mark_generated_neighbors_dirty(coord);
                    }
                    // A mark that landed while this build was in flight was
                    // drained from the set but rejected by remesh; requeue
                    // it now so the next sweep rebuilds with fresh borders.
                    if chunk.is_dirty() {
                        self.mark_dirty(coord);
                    }
                }
            }
        }
        stats
    }

    fn mark_generated_neighbors_dirty(&self, coord: ChunkCoord) {
        for neighbor in self.adjacent(coord).into_iter().flatten() {
            if neighbor.is_generated() && neighbor.has_voxels() {
                self.mark_dirty(neighbor.coord);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_world::WorldGenConfig;
    use loam_world::worldgen::SurfaceConfig;

    fn flat_state(height: f32) -> WorldState {
        let reg = Arc::new(BlockRegistry::default_palette());
        let surface = SurfaceConfig::default().resolve(&reg).unwrap();
        let cfg = WorldGenConfig::default();
        let world = Arc::new(World::with_height_field(
            4,
            4,
            4,
            1,
            &cfg,
            Arc::new(move |_: f32, _: f32| (height, 0.0)),
        ));
        WorldState::new(world, reg, surface, 1)
    }

    #[test]
    fn request_chunk_is_first_writer_wins() {
        let state = flat_state(2.0);
        let coord = ChunkCoord::new(0, 0, 0);
        assert!(state.request_chunk(coord));
        assert!(!state.request_chunk(coord));
        assert_eq!(state.chunk_count(), 1);
    }

    #[test]
    fn mark_dirty_is_idempotent() {
        let state = flat_state(2.0);
        let coord = ChunkCoord::new(0, 0, 0);
        state.request_chunk(coord);
        state.mark_dirty(coord);
        state.mark_dirty(coord);
        assert_eq!(state.dirty_len(), 1);
        let drained = state.drain_dirty();
        assert_eq!(drained, vec![coord]);
        assert_eq!(state.dirty_len(), 0);
    }

    #[test]
    fn mark_dirty_ignores_unknown_chunks() {
        let state = flat_state(2.0);
        state.mark_dirty(ChunkCoord::new(9, 9, 9));
        assert_eq!(state.dirty_len(), 0);
    }

    #[test]
    fn remesh_rejects_ungenerated_chunks() {
        let state = flat_state(2.0);
        let coord = ChunkCoord::new(0, 0, 0);
        state.request_chunk(coord);
        // no pump yet, so the chunk has no voxel data
        state.mark_dirty(coord);
        assert!(!state.remesh(coord));
        let chunk = state.get(coord).unwrap();
        assert!(chunk.is_dirty(), "rejected remesh must not clear dirty");
        assert!(!chunk.is_meshing());
    }

    #[test]
    fn overlapping_begin_meshing_claims_once() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0, 0));
        assert!(chunk.begin_meshing());
        assert!(!chunk.begin_meshing());
        chunk.meshing.store(false, Ordering::Release);
        assert!(chunk.begin_meshing());
    }
}
