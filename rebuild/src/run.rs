//! The rebuild sequence: clean, create, configure, build.
//!
//! Steps run strictly in order and each one, including the child process,
//! finishes before the next starts. Filesystem failures abort before any tool
//! runs. A tool that exits unsuccessfully does not abort the sequence unless
//! `keep_going` is off; its outcome is recorded in the [`RebuildReport`].

use std::path::{self, Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::core::plan::RebuildPlan;
use crate::core::types::{RebuildReport, Step};
use crate::error::RebuildError;
use crate::io::build_dir::reset_build_dir;
use crate::io::tool::ToolRunner;

/// Make `root` absolute against the current directory without resolving
/// symlinks. The tools run inside the build directory, so a relative root
/// would point somewhere else from their point of view.
pub fn absolute_root(root: &Path) -> Result<PathBuf, RebuildError> {
    path::absolute(root).map_err(|err| RebuildError::filesystem("resolve", root, err))
}

/// Execute `plan` using `runner` for the two tool steps.
#[instrument(skip_all, fields(root = %plan.root.display(), jobs = plan.jobs))]
pub fn run_rebuild<R: ToolRunner>(
    plan: &RebuildPlan,
    runner: &R,
) -> Result<RebuildReport, RebuildError> {
    reset_build_dir(&plan.build_dir)?;

    let configure = runner.run(&plan.configure)?;
    info!(step = %Step::Configure, outcome = %configure, "step finished");

    let build = if configure.is_success() || plan.keep_going {
        let outcome = runner.run(&plan.build)?;
        info!(step = %Step::Build, outcome = %outcome, "step finished");
        Some(outcome)
    } else {
        warn!(outcome = %configure, "configure failed, skipping build");
        None
    };

    Ok(RebuildReport {
        build_dir: plan.build_dir.clone(),
        configure,
        build,
    })
}

/// Turn an unsuccessful report into [`RebuildError::BuildFailure`].
pub fn check_report(report: &RebuildReport) -> Result<(), RebuildError> {
    match report.first_failure() {
        Some((step, outcome)) => Err(RebuildError::BuildFailure { step, outcome }),
        None => Ok(()),
    }
}
