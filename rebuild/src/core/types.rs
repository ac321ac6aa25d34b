use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// The two external tool steps of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Configure,
    Build,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Configure => f.write_str("configure"),
            Step::Build => f.write_str("build"),
        }
    }
}

/// How a tool process terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    /// Non-zero exit. `code` is `None` when the process was killed by a signal.
    Failed {
        code: Option<i32>,
    },
    /// Killed after exceeding the configured timeout.
    TimedOut,
}

impl StepOutcome {
    pub fn from_exit(success: bool, code: Option<i32>) -> Self {
        if success {
            StepOutcome::Succeeded
        } else {
            StepOutcome::Failed { code }
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Succeeded => f.write_str("ok"),
            StepOutcome::Failed { code: Some(code) } => write!(f, "exit {code}"),
            StepOutcome::Failed { code: None } => f.write_str("killed by signal"),
            StepOutcome::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Result of a completed rebuild sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
    pub build_dir: PathBuf,
    pub configure: StepOutcome,
    /// `None` when the build step was skipped after a failed configure.
    pub build: Option<StepOutcome>,
}

impl RebuildReport {
    pub fn succeeded(&self) -> bool {
        self.first_failure().is_none() && self.build.is_some()
    }

    /// The earliest step that did not succeed, if any.
    pub fn first_failure(&self) -> Option<(Step, StepOutcome)> {
        if !self.configure.is_success() {
            return Some((Step::Configure, self.configure));
        }
        match self.build {
            Some(outcome) if !outcome.is_success() => Some((Step::Build, outcome)),
            _ => None,
        }
    }

    /// One-line summary in `key=value` form.
    pub fn summary(&self) -> String {
        let build = match self.build {
            Some(outcome) => outcome.to_string(),
            None => "skipped".to_string(),
        };
        format!(
            "rebuild: build_dir={} configure={} build={}",
            self.build_dir.display(),
            self.configure,
            build
        )
    }
}
