use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use loam::{AppConfig, StreamingController, WorldState};
use loam_blocks::BlockRegistry;
use loam_world::{ChunkCoord, World, parse_seed};

#[derive(Parser, Debug)]
#[command(name = "loam", about = "Streaming voxel terrain engine")]
struct Args {
    /// Path to an app config TOML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed text; overrides the config value
    #[arg(long)]
    seed: Option<String>,
    /// Background worker count; overrides the config value
    #[arg(long)]
    workers: Option<usize>,
    /// Horizontal streaming radius in chunks; overrides the config value
    #[arg(long)]
    radius: Option<i32>,
    /// Give up after this many ticks even if work is still pending
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
}

fn main() {
    env_logger::init();
    if let Err(e) = run(Args::parse()) {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut cfg = match &args.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(workers) = args.workers {
        cfg.workers = workers;
    }
    if let Some(radius) = args.radius {
        cfg.radius = radius;
    }

    let seed = parse_seed(&cfg.seed);
    let reg = Arc::new(match &cfg.palette {
        Some(path) => BlockRegistry::load_from_path(path)?,
        None => BlockRegistry::default_palette(),
    });
    let surface = cfg.worldgen.surface.resolve(&reg)?;
    let [sx, sy, sz] = cfg.chunk_size;
    let world = Arc::new(World::new(sx, sy, sz, seed, &cfg.worldgen));
    log::info!(
        "world seed={} chunk={}x{}x{} block_size={} workers={}",
        seed,
        sx,
        sy,
        sz,
        world.block_size,
        cfg.workers
    );

    let state = WorldState::new(world, reg, surface, cfg.workers);
    let mut controller = StreamingController::new(cfg.radius, cfg.chunks_y);
    controller.set_center(&state, ChunkCoord::new(0, 0, 0));

    let t_start = Instant::now();
    let mut meshed = 0usize;
    let mut generated = 0usize;
    let mut total_quads = 0usize;
    // Two consecutive quiet ticks mean no results can still be in the
    // channel, so the world has settled.
    let mut quiet_ticks = 0u32;
    for _ in 0..args.max_ticks {
        let stats = controller.tick(&state, |_, cpu| {
            total_quads += cpu.mesh.quad_count();
        });
        generated += stats.generated;
        meshed += stats.meshed;

        let idle = state.runtime.is_idle() && state.dirty_len() == 0;
        if idle && stats.generated == 0 && stats.meshed == 0 {
            quiet_ticks += 1;
            if quiet_ticks >= 2 {
                break;
            }
        } else {
            quiet_ticks = 0;
        }
        thread::sleep(Duration::from_millis(5));
    }

    let (queued, inflight) = state.runtime.queue_debug_counts();
    log::info!(
        "settled after {:.1?}: {} chunks, {} generated, {} meshes, {} quads (queue {}/{})",
        t_start.elapsed(),
        state.chunk_count(),
        generated,
        meshed,
        total_quads,
        queued,
        inflight
    );
    Ok(())
}
