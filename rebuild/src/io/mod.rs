//! I/O helpers for the rebuild sequence.

pub mod build_dir;
pub mod config;
pub mod tool;
