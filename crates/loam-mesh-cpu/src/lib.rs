//! Greedy CPU mesher for chunk voxel buffers.
#![forbid(unsafe_code)]

mod boundary;
mod chunk;
mod face;
mod greedy;
mod mesh_build;

pub use boundary::BoundarySlices;
pub use chunk::ChunkMeshCpu;
pub use face::{ALL_FACES, Face};
pub use greedy::{combine_builds, mesh_chunk_directions, mesh_direction};
pub use mesh_build::{GreedyVertex, MeshBuild};
