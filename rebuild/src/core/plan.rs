//! Resolve a project root and config into the concrete steps of a run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::config::{RebuildConfig, ToolConfig};
use crate::core::types::Step;

/// One external tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub step: Step,
    pub program: String,
    pub args: Vec<OsString>,
    /// Working directory for the child. Always the build directory.
    pub workdir: PathBuf,
    pub timeout: Option<Duration>,
}

impl ToolInvocation {
    fn new(step: Step, tool: &ToolConfig, last_arg: OsString, workdir: &Path) -> Self {
        let mut args: Vec<OsString> = tool.extra_args().iter().map(OsString::from).collect();
        args.push(last_arg);
        Self {
            step,
            program: tool.program().to_string(),
            args,
            workdir: workdir.to_path_buf(),
            timeout: None,
        }
    }

    /// Human-readable command line, for logs and `--dry-run`.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().map(|arg| arg.to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything a run needs, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RebuildPlan {
    pub root: PathBuf,
    pub build_dir: PathBuf,
    pub jobs: usize,
    pub configure: ToolInvocation,
    pub build: ToolInvocation,
    pub keep_going: bool,
    pub check_status: bool,
}

impl RebuildPlan {
    /// Build a plan for `root`, which should already be absolute: the tools
    /// run inside the build directory and receive `root` verbatim.
    pub fn new(root: &Path, cfg: &RebuildConfig) -> Self {
        let build_dir = root.join(&cfg.build_dir);
        let jobs = cfg.jobs.resolve();
        let timeout = cfg.timeout_secs.map(Duration::from_secs);

        let mut configure = ToolInvocation::new(
            Step::Configure,
            &cfg.configure,
            root.as_os_str().to_os_string(),
            &build_dir,
        );
        configure.timeout = timeout;

        let mut build = ToolInvocation::new(
            Step::Build,
            &cfg.build,
            OsString::from(format!("-j{jobs}")),
            &build_dir,
        );
        build.timeout = timeout;

        Self {
            root: root.to_path_buf(),
            build_dir,
            jobs,
            configure,
            build,
            keep_going: cfg.keep_going,
            check_status: cfg.check_status,
        }
    }

    /// Lines printed by `--dry-run`.
    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("remove {}", self.build_dir.display()),
            format!("create {}", self.build_dir.display()),
            format!(
                "run `{}` in {}",
                self.configure.command_line(),
                self.build_dir.display()
            ),
            format!(
                "run `{}` in {}",
                self.build.command_line(),
                self.build_dir.display()
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::jobs::Jobs;

    #[test]
    fn default_plan_matches_cmake_then_make() {
        let plan = RebuildPlan::new(Path::new("/tmp/proj"), &RebuildConfig::default());

        assert_eq!(plan.build_dir, PathBuf::from("/tmp/proj/build"));
        assert_eq!(plan.configure.program, "cmake");
        assert_eq!(plan.configure.args, vec![OsString::from("/tmp/proj")]);
        assert_eq!(plan.configure.workdir, plan.build_dir);
        assert_eq!(plan.build.program, "make");
        assert_eq!(plan.build.args, vec![OsString::from("-j6")]);
        assert_eq!(plan.build.workdir, plan.build_dir);
        assert_eq!(plan.configure.timeout, None);
        assert!(plan.keep_going);
        assert!(!plan.check_status);
    }

    #[test]
    fn extra_args_precede_generated_argument() {
        let cfg = RebuildConfig {
            jobs: Jobs::fixed(2).expect("jobs"),
            timeout_secs: Some(30),
            configure: ToolConfig::new(&["cmake", "-G", "Ninja"]),
            build: ToolConfig::new(&["ninja", "-v"]),
            ..RebuildConfig::default()
        };
        let plan = RebuildPlan::new(Path::new("/src/app"), &cfg);

        assert_eq!(plan.configure.command_line(), "cmake -G Ninja /src/app");
        assert_eq!(plan.build.command_line(), "ninja -v -j2");
        assert_eq!(plan.build.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn describe_lists_steps_in_order() {
        let plan = RebuildPlan::new(Path::new("/p"), &RebuildConfig::default());
        assert_eq!(
            plan.describe(),
            vec![
                "remove /p/build",
                "create /p/build",
                "run `cmake /p` in /p/build",
                "run `make -j6` in /p/build",
            ]
        );
    }
}
