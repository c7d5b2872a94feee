//! Background job queues and worker orchestration.
//!
//! A fixed pool of workers pulls generation and mesh jobs from one FIFO
//! channel, so at most `workers` jobs run concurrently and the rest wait
//! queued in submission order. Results come back over a second channel
//! and are drained on the caller's thread.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender, unbounded};
use loam_blocks::BlockRegistry;
use loam_chunk::{ChunkBuf, ChunkOccupancy, generate_chunk_buffer};
use loam_mesh_cpu::{ALL_FACES, BoundarySlices, MeshBuild, mesh_direction};
use loam_world::{ChunkCoord, SurfaceBlocks, World};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Work submitted to the pool.
pub enum Job {
    Generate { coord: ChunkCoord },
    Mesh(MeshJob),
}

pub struct MeshJob {
    pub coord: ChunkCoord,
    /// First mesh after generation; completion dirties the neighbors.
    pub initial: bool,
    pub buf: Arc<ChunkBuf>,
    pub borders: BoundarySlices,
}

pub enum JobOut {
    Generated {
        coord: ChunkCoord,
        buf: ChunkBuf,
        occupancy: ChunkOccupancy,
        t_gen_ms: u32,
    },
    Meshed {
        coord: ChunkCoord,
        initial: bool,
        parts: Box<[MeshBuild; 6]>,
        t_mesh_ms: u32,
    },
}

fn elapsed_ms(t0: Instant) -> u32 {
    t0.elapsed().as_millis().min(u128::from(u32::MAX)) as u32
}

fn process_job(
    job: Job,
    world: &World,
    reg: &BlockRegistry,
    surface: SurfaceBlocks,
    pool: &ThreadPool,
    tx: &Sender<JobOut>,
) {
    match job {
        Job::Generate { coord } => {
            let t0 = Instant::now();
            let generated = generate_chunk_buffer(world, coord, surface);
            let _ = tx.send(JobOut::Generated {
                coord,
                buf: generated.buf,
                occupancy: generated.occupancy,
                t_gen_ms: elapsed_ms(t0),
            });
        }
        Job::Mesh(MeshJob {
            coord,
            initial,
            buf,
            borders,
        }) => {
            let t0 = Instant::now();
            let mut parts: [MeshBuild; 6] = Default::default();
            pool.scope(|s| {
                for (face, slot) in ALL_FACES.iter().zip(parts.iter_mut()) {
                    let buf = buf.as_ref();
                    let borders = &borders;
                    s.spawn(move |_| {
                        *slot = mesh_direction(buf, borders, reg, world.block_size, *face);
                    });
                }
            });
            let _ = tx.send(JobOut::Meshed {
                coord,
                initial,
                parts: Box::new(parts),
                t_mesh_ms: elapsed_ms(t0),
            });
        }
    }
}

pub struct Runtime {
    job_tx: Sender<Job>,
    res_rx: Receiver<JobOut>,
    _worker_pool: Arc<ThreadPool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    pub workers: usize,
}

impl Runtime {
    pub fn new(
        world: Arc<World>,
        reg: Arc<BlockRegistry>,
        surface: SurfaceBlocks,
        workers: usize,
    ) -> Self {
        let workers = workers.max(1);
        let (job_tx, job_rx) = unbounded::<Job>();
        let (res_tx, res_rx) = unbounded::<JobOut>();
        let queued_ctr = Arc::new(AtomicUsize::new(0));
        let inflight_ctr = Arc::new(AtomicUsize::new(0));

        let worker_pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("loam-worker-{i}"))
                .build()
                .expect("worker pool"),
        );
        // Mesh jobs fan their six directions out across the same pool.
        let mesh_pool = worker_pool.clone();
        for _ in 0..workers {
            let rx = job_rx.clone();
            let tx = res_tx.clone();
            let world = world.clone();
            let reg = reg.clone();
            let queued = queued_ctr.clone();
            let inflight = inflight_ctr.clone();
            let mesh_pool = mesh_pool.clone();
            thread::spawn(move || {
                while let Ok(job) = rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    process_job(job, world.as_ref(), reg.as_ref(), surface, &mesh_pool, &tx);
                    inflight.fetch_sub(1, Ordering::Relaxed);
                }
                log::debug!("job channel closed, worker exiting");
            });
        }

        Self {
            job_tx,
            res_rx,
            _worker_pool: worker_pool,
            queued: queued_ctr,
            inflight: inflight_ctr,
            workers,
        }
    }

    pub fn submit_generate(&self, coord: ChunkCoord) {
        self.submit(Job::Generate { coord });
    }

    pub fn submit_mesh(&self, job: MeshJob) {
        self.submit(Job::Mesh(job));
    }

    fn submit(&self, job: Job) {
        self.queued.fetch_add(1, Ordering::Relaxed);
        if self.job_tx.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Non-blocking drain of every finished job.
    pub fn drain_worker_results(&self) -> Vec<JobOut> {
        self.res_rx.try_iter().collect()
    }

    /// `(queued, inflight)` snapshot for logs and debug overlays.
    pub fn queue_debug_counts(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    pub fn is_idle(&self) -> bool {
        let (q, f) = self.queue_debug_counts();
        q == 0 && f == 0
    }
}
