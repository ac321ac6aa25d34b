//! Tool runner abstraction for the configure and build steps.
//!
//! The [`ToolRunner`] trait decouples the rebuild sequence from actual process
//! spawning. Tests use a recording runner that returns scripted outcomes
//! without touching the system.

use std::io::ErrorKind;
use std::process::{Child, Command, ExitStatus};

use tracing::{debug, error, info, instrument, warn};
use wait_timeout::ChildExt;

use crate::core::plan::ToolInvocation;
use crate::core::types::StepOutcome;
use crate::error::RebuildError;

/// Abstraction over how a tool invocation is executed.
pub trait ToolRunner {
    /// Run the tool to completion and report how it terminated.
    ///
    /// A non-zero exit is an `Ok` outcome; only failing to start or wait on the
    /// process is an error.
    fn run(&self, invocation: &ToolInvocation) -> Result<StepOutcome, RebuildError>;
}

/// Runner that spawns the tool as a child process with inherited stdio.
pub struct SystemToolRunner;

impl ToolRunner for SystemToolRunner {
    #[instrument(skip_all, fields(step = %invocation.step, program = %invocation.program))]
    fn run(&self, invocation: &ToolInvocation) -> Result<StepOutcome, RebuildError> {
        info!(
            command = %invocation.command_line(),
            workdir = %invocation.workdir.display(),
            "starting tool"
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&invocation.workdir);

        debug!("spawning child process");
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                error!("tool not found");
                return Err(RebuildError::ToolNotFound {
                    step: invocation.step,
                    program: invocation.program.clone(),
                });
            }
            Err(err) => {
                error!(err = %err, "failed to spawn tool");
                return Err(invocation_error(invocation, "spawn", err));
            }
        };

        let outcome = match wait_for(&mut child, invocation)? {
            Some(status) => outcome_from_status(status),
            None => StepOutcome::TimedOut,
        };

        if outcome.is_success() {
            debug!("tool completed successfully");
        } else {
            warn!(outcome = %outcome, "tool did not succeed");
        }
        Ok(outcome)
    }
}

/// Wait for the child, killing it if it outlives the invocation's timeout.
///
/// Returns `None` when the child was killed for timing out.
fn wait_for(
    child: &mut Child,
    invocation: &ToolInvocation,
) -> Result<Option<ExitStatus>, RebuildError> {
    let Some(timeout) = invocation.timeout else {
        let status = child
            .wait()
            .map_err(|err| invocation_error(invocation, "wait for", err))?;
        return Ok(Some(status));
    };

    match child
        .wait_timeout(timeout)
        .map_err(|err| invocation_error(invocation, "wait for", err))?
    {
        Some(status) => Ok(Some(status)),
        None => {
            warn!(timeout_secs = timeout.as_secs(), "tool timed out, killing");
            child
                .kill()
                .map_err(|err| invocation_error(invocation, "kill", err))?;
            child
                .wait()
                .map_err(|err| invocation_error(invocation, "wait for", err))?;
            Ok(None)
        }
    }
}

fn outcome_from_status(status: ExitStatus) -> StepOutcome {
    StepOutcome::from_exit(status.success(), status.code())
}

fn invocation_error(
    invocation: &ToolInvocation,
    action: &'static str,
    source: std::io::Error,
) -> RebuildError {
    RebuildError::ToolInvocation {
        step: invocation.step,
        action,
        program: invocation.program.clone(),
        source,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::ffi::OsString;
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    use super::*;
    use crate::core::types::Step;

    fn invocation(dir: &Path, program: &str, args: &[&str]) -> ToolInvocation {
        ToolInvocation {
            step: Step::Build,
            program: program.to_string(),
            args: args.iter().map(OsString::from).collect(),
            workdir: dir.to_path_buf(),
            timeout: None,
        }
    }

    #[test]
    fn reports_success_and_exit_code() {
        let temp = tempfile::tempdir().expect("tempdir");
        let ok = SystemToolRunner
            .run(&invocation(temp.path(), "sh", &["-c", "exit 0"]))
            .expect("run");
        assert_eq!(ok, StepOutcome::Succeeded);

        let failed = SystemToolRunner
            .run(&invocation(temp.path(), "sh", &["-c", "exit 7"]))
            .expect("run");
        assert_eq!(failed, StepOutcome::Failed { code: Some(7) });
    }

    #[test]
    fn runs_in_requested_workdir() {
        let temp = tempfile::tempdir().expect("tempdir");
        SystemToolRunner
            .run(&invocation(temp.path(), "sh", &["-c", "pwd > cwd.txt"]))
            .expect("run");

        let recorded = fs::read_to_string(temp.path().join("cwd.txt")).expect("read");
        let expected = fs::canonicalize(temp.path()).expect("canonicalize");
        assert_eq!(
            fs::canonicalize(recorded.trim()).expect("canonicalize"),
            expected
        );
    }

    #[test]
    fn missing_program_is_tool_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = SystemToolRunner
            .run(&invocation(temp.path(), "rebuild-no-such-tool-xyz", &[]))
            .unwrap_err();
        assert!(matches!(
            err,
            RebuildError::ToolNotFound {
                step: Step::Build,
                ..
            }
        ));
    }

    #[test]
    fn kills_tool_after_timeout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut slow = invocation(temp.path(), "sleep", &["5"]);
        slow.timeout = Some(Duration::from_millis(100));

        let outcome = SystemToolRunner.run(&slow).expect("run");
        assert_eq!(outcome, StepOutcome::TimedOut);
    }
}
