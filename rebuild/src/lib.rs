//! Reset a project's build directory and drive its build tools.
//!
//! A run is a fixed, strictly sequential sequence: remove `<root>/build`,
//! recreate it empty, run the configuration tool (default `cmake <root>`)
//! inside it, then run the build tool (default `make -j6`) inside it.
//!
//! - **[`core`]**: Pure logic (parallelism, plan resolution, outcomes).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config file, build directory,
//!   process execution). Tool execution sits behind [`io::tool::ToolRunner`]
//!   so tests can substitute a recording double.
//!
//! [`run::run_rebuild`] ties the two together for the CLI.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod run;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
