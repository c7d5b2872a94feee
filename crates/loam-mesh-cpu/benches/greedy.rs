use criterion::{Criterion, black_box, criterion_group, criterion_main};

use loam_blocks::BlockRegistry;
use loam_chunk::generate_chunk_buffer;
use loam_mesh_cpu::{BoundarySlices, combine_builds, mesh_chunk_directions};
use loam_world::worldgen::SurfaceConfig;
use loam_world::{ChunkCoord, World, WorldGenConfig};

fn bench_mesh_generated_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_generated_chunk");
    let reg = BlockRegistry::default_palette();
    let cfg = WorldGenConfig::default();
    let surface = SurfaceConfig::default().resolve(&reg).unwrap();
    let world = World::new(64, 64, 64, 0xC0FFEE_i32, &cfg);
    let gen = generate_chunk_buffer(&world, ChunkCoord::new(0, 1, 0), surface);
    let borders = BoundarySlices::gather([None; 6]);
    group.bench_function("terrain_64x64x64", |b| {
        b.iter(|| {
            let parts = mesh_chunk_directions(&gen.buf, &borders, &reg, world.block_size);
            black_box(combine_builds(&parts));
        })
    });
    group.finish();
}

fn bench_mesh_flat_slab(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_flat_slab");
    let reg = BlockRegistry::default_palette();
    let cfg = WorldGenConfig::default();
    let surface = SurfaceConfig::default().resolve(&reg).unwrap();
    let world = World::with_height_field(
        64,
        64,
        64,
        1,
        &cfg,
        std::sync::Arc::new(|_wx: f32, _wz: f32| (32.0, 0.0)),
    );
    let gen = generate_chunk_buffer(&world, ChunkCoord::new(0, 0, 0), surface);
    let borders = BoundarySlices::gather([None; 6]);
    group.bench_function("flat_64x64x64", |b| {
        b.iter(|| {
            let parts = mesh_chunk_directions(&gen.buf, &borders, &reg, world.block_size);
            black_box(combine_builds(&parts));
        })
    });
    group.finish();
}

criterion_group!(benches, bench_mesh_generated_chunk, bench_mesh_flat_slab);
criterion_main!(benches);
