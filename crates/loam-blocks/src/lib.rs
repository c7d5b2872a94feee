//! Block palette and registry crate.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;

pub use registry::{AIR, BlockDef, BlockId, BlockRegistry};
