//! Wipe a project's build directory and rerun its build tools.
//!
//! Equivalent to `rm -rf <root>/build && mkdir <root>/build && cd <root>/build
//! && cmake <root>; make -j6`, with the root, tools, and job count configurable
//! and each tool's exit status reported.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use rebuild::core::jobs::Jobs;
use rebuild::core::plan::RebuildPlan;
use rebuild::error::RebuildError;
use rebuild::exit_codes;
use rebuild::io::config::{CONFIG_FILE_NAME, load_config, load_required_config};
use rebuild::io::tool::SystemToolRunner;
use rebuild::logging;
use rebuild::run::{absolute_root, check_report, run_rebuild};

#[derive(Debug, Parser)]
#[command(
    name = "rebuild",
    version,
    about = "Reset the build directory, then run the configure and build tools in it"
)]
struct Cli {
    /// Project root containing the top-level build configuration.
    #[arg(long, env = "REBUILD_ROOT", default_value = ".")]
    root: PathBuf,

    /// Config file to use instead of `<root>/rebuild.toml`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parallel build jobs: a positive integer or `auto`.
    #[arg(short, long, env = "REBUILD_JOBS")]
    jobs: Option<Jobs>,

    /// Exit non-zero when a tool does not succeed.
    #[arg(long)]
    check: bool,

    /// Print the steps without touching the filesystem or running tools.
    #[arg(long)]
    dry_run: bool,

    /// Print the final report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    logging::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{:#}", err);
        process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    let root = absolute_root(&cli.root)?;
    let mut cfg = match &cli.config {
        Some(path) => load_required_config(path)?,
        None => load_config(&root.join(CONFIG_FILE_NAME))?,
    };
    if let Some(jobs) = cli.jobs {
        cfg.jobs = jobs;
    }
    if cli.check {
        cfg.check_status = true;
    }

    let plan = RebuildPlan::new(&root, &cfg);
    debug!(?plan, "resolved plan");

    if cli.dry_run {
        for line in plan.describe() {
            println!("dry-run: {line}");
        }
        return Ok(());
    }

    let report = run_rebuild(&plan, &SystemToolRunner)?;
    if cli.json {
        let payload = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{payload}");
    } else {
        println!("{}", report.summary());
    }

    if plan.check_status {
        check_report(&report)?;
    }
    Ok(())
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RebuildError>()
        .map_or(exit_codes::INVALID, RebuildError::exit_code)
}
