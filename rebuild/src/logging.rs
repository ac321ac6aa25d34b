//! Diagnostic tracing for the rebuild CLI.
//!
//! Tracing goes to stderr and is controlled by `RUST_LOG`. The tools' own
//! output is inherited unchanged, and the final summary is printed to stdout,
//! so neither is affected by the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
///
/// # Example
/// ```bash
/// RUST_LOG=rebuild=debug rebuild --root ~/src/project
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
