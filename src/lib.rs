//! Chunked voxel terrain engine: streaming chunk store, background
//! generation and greedy meshing.
#![forbid(unsafe_code)]

pub mod config;
pub mod store;
pub mod streaming;

pub use config::AppConfig;
pub use store::{Chunk, ChunkHandle, PumpStats, WorldState};
pub use streaming::StreamingController;
