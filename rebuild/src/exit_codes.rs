//! Stable exit codes for the rebuild CLI.

/// Orchestration succeeded. Tool exit codes are ignored unless `--check` is set.
pub const OK: i32 = 0;
/// Invalid configuration or any other unexpected error.
pub const INVALID: i32 = 1;
/// A tool exited unsuccessfully and status checking was enabled.
pub const BUILD_FAILURE: i32 = 3;
/// The build directory could not be cleaned or created.
pub const FILESYSTEM: i32 = 4;
/// A tool could not be found, spawned, or waited on.
pub const TOOL_INVOCATION: i32 = 5;
