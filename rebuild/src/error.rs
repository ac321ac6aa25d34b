//! Error taxonomy for a rebuild run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::core::types::{Step, StepOutcome};
use crate::exit_codes;

#[derive(Debug, Error)]
pub enum RebuildError {
    /// Cleaning or creating the build directory failed.
    #[error("{action} {}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Something other than a directory occupies the build path.
    #[error("{} exists but is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    /// The tool program could not be found on `PATH`.
    #[error("{step} tool `{program}` not found")]
    ToolNotFound { step: Step, program: String },

    /// Spawning or waiting on the tool failed for another reason.
    #[error("{action} {step} tool `{program}`")]
    ToolInvocation {
        step: Step,
        action: &'static str,
        program: String,
        #[source]
        source: io::Error,
    },

    /// A tool ran but did not succeed, and status checking was requested.
    #[error("{step} step failed: {outcome}")]
    BuildFailure { step: Step, outcome: StepOutcome },
}

impl RebuildError {
    pub fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        RebuildError::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn is_filesystem(&self) -> bool {
        matches!(
            self,
            RebuildError::Filesystem { .. } | RebuildError::NotADirectory { .. }
        )
    }

    pub fn is_tool_invocation(&self) -> bool {
        matches!(
            self,
            RebuildError::ToolNotFound { .. } | RebuildError::ToolInvocation { .. }
        )
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_filesystem() {
            exit_codes::FILESYSTEM
        } else if self.is_tool_invocation() {
            exit_codes::TOOL_INVOCATION
        } else {
            exit_codes::BUILD_FAILURE
        }
    }
}
