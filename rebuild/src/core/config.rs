//! Rebuild configuration as plain data.
//!
//! Loading from disk lives in [`crate::io::config`].

use std::path::{Component, Path};

use anyhow::{Result, anyhow};
use serde::Deserialize;

use crate::core::jobs::Jobs;

/// Rebuild configuration (TOML).
///
/// Every field is optional. The defaults reproduce `cmake <root>` followed by
/// `make -j6` inside `<root>/build`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RebuildConfig {
    /// Name of the build directory under the project root.
    pub build_dir: String,

    /// Parallel jobs passed to the build tool as `-j<N>`.
    pub jobs: Jobs,

    /// Run the build step even when configure did not succeed.
    pub keep_going: bool,

    /// Treat a failed or timed-out tool as a run failure.
    pub check_status: bool,

    /// Per-tool wall-clock limit. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,

    pub configure: ToolConfig,

    pub build: ToolConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ToolConfig {
    /// Program followed by extra arguments (e.g. `["cmake", "-G", "Ninja"]`).
    pub command: Vec<String>,
}

impl ToolConfig {
    pub fn new(command: &[&str]) -> Self {
        Self {
            command: command.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    pub fn extra_args(&self) -> &[String] {
        self.command.get(1..).unwrap_or_default()
    }
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            build_dir: "build".to_string(),
            jobs: Jobs::default(),
            keep_going: true,
            check_status: false,
            timeout_secs: None,
            configure: ToolConfig::new(&["cmake"]),
            build: ToolConfig::new(&["make"]),
        }
    }
}

impl RebuildConfig {
    pub fn validate(&self) -> Result<()> {
        validate_build_dir(&self.build_dir)?;
        if self.timeout_secs == Some(0) {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.configure.program().trim().is_empty() {
            return Err(anyhow!("configure.command must be a non-empty array"));
        }
        if self.build.program().trim().is_empty() {
            return Err(anyhow!("build.command must be a non-empty array"));
        }
        Ok(())
    }
}

fn validate_build_dir(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(anyhow!(
            "build_dir must be a single directory name, got `{name}`"
        )),
    }
}
