//! Test-only helpers: a scratch project root and a recording tool runner.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::plan::ToolInvocation;
use crate::core::types::{Step, StepOutcome};
use crate::error::RebuildError;
use crate::io::tool::ToolRunner;

/// A scripted response for one tool invocation.
#[derive(Debug)]
pub enum ScriptedTool {
    Outcome(StepOutcome),
    NotFound,
}

/// Snapshot of one invocation as the runner saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub invocation: ToolInvocation,
    /// Entries present in the working directory when the tool was started.
    pub workdir_entries: Vec<String>,
}

/// Tool runner that records every invocation and replays scripted outcomes.
///
/// When the script runs out, further invocations succeed.
#[derive(Debug, Default)]
pub struct RecordingToolRunner {
    script: RefCell<VecDeque<ScriptedTool>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl RecordingToolRunner {
    pub fn new(script: Vec<ScriptedTool>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub fn steps(&self) -> Vec<Step> {
        self.calls
            .borrow()
            .iter()
            .map(|call| call.invocation.step)
            .collect()
    }

    pub fn count(&self, step: Step) -> usize {
        self.steps().into_iter().filter(|s| *s == step).count()
    }
}

impl ToolRunner for RecordingToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<StepOutcome, RebuildError> {
        let workdir_entries = list_entries(&invocation.workdir);
        self.calls.borrow_mut().push(RecordedCall {
            invocation: invocation.clone(),
            workdir_entries,
        });
        match self.script.borrow_mut().pop_front() {
            Some(ScriptedTool::Outcome(outcome)) => Ok(outcome),
            Some(ScriptedTool::NotFound) => Err(RebuildError::ToolNotFound {
                step: invocation.step,
                program: invocation.program.clone(),
            }),
            None => Ok(StepOutcome::Succeeded),
        }
    }
}

fn list_entries(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// A temporary project root, removed on drop.
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temp project")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn build_dir(&self) -> PathBuf {
        self.root().join("build")
    }

    /// Create `build/<name>` with placeholder contents, creating `build/` too.
    pub fn write_build_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.build_dir().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, b"stale").with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }

    /// Write `rebuild.toml` at the project root.
    pub fn write_config(&self, contents: &str) -> Result<PathBuf> {
        let path = self.root().join(crate::io::config::CONFIG_FILE_NAME);
        fs::write(&path, contents).with_context(|| format!("write {}", path.display()))?;
        Ok(path)
    }
}

/// Restricts a path's permission bits until dropped, then restores them.
#[cfg(unix)]
pub struct ReadOnlyGuard {
    path: PathBuf,
    original: fs::Permissions,
}

#[cfg(unix)]
impl ReadOnlyGuard {
    /// Apply `mode` (e.g. `0o555`) to `path`.
    pub fn new(path: &Path, mode: u32) -> Result<Self> {
        use std::os::unix::fs::PermissionsExt;

        let original = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .permissions();
        fs::set_permissions(path, fs::Permissions::from_mode(mode))
            .with_context(|| format!("chmod {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            original,
        })
    }

    /// Whether the restriction actually blocks writes. Permission bits are
    /// not enforced for root, so callers skip their assertions when false.
    pub fn enforced(&self) -> bool {
        let marker = self.path.join(".rebuild-write-check");
        match fs::write(&marker, b"") {
            Ok(()) => {
                let _ = fs::remove_file(&marker);
                false
            }
            Err(_) => true,
        }
    }
}

#[cfg(unix)]
impl Drop for ReadOnlyGuard {
    fn drop(&mut self) {
        let _ = fs::set_permissions(&self.path, self.original.clone());
    }
}
