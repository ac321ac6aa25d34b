//! Pure, deterministic logic for the rebuild sequence.
//!
//! Nothing here touches the filesystem or spawns processes.

pub mod config;
pub mod jobs;
pub mod plan;
pub mod types;
