//! Load the optional per-project configuration from `<root>/rebuild.toml`.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::config::RebuildConfig;

/// File name looked up under the project root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "rebuild.toml";

/// Load config from a TOML file.
///
/// If the file is missing, returns `RebuildConfig::default()`. Any other read
/// failure (e.g. permission denied) is an error.
pub fn load_config(path: &Path) -> Result<RebuildConfig> {
    match fs::read_to_string(path) {
        Ok(contents) => parse_config(path, &contents),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            let cfg = RebuildConfig::default();
            cfg.validate()?;
            Ok(cfg)
        }
        Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
    }
}

/// Load config from a file the user named explicitly. The file must exist.
pub fn load_required_config(path: &Path) -> Result<RebuildConfig> {
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(path, &contents)
}

fn parse_config(path: &Path, contents: &str) -> Result<RebuildConfig> {
    let cfg: RebuildConfig =
        toml::from_str(contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ToolConfig;
    use crate::core::jobs::Jobs;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, RebuildConfig::default());
    }

    #[test]
    fn required_config_must_exist() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("typo-rebuild.toml");

        let err = load_required_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("typo-rebuild.toml"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "jobs = \"auto\"\ncheck_status = true\n\n[build]\ncommand = [\"ninja\", \"-v\"]\n",
        )
        .expect("write");

        for cfg in [
            load_config(&path).expect("load"),
            load_required_config(&path).expect("load required"),
        ] {
            assert_eq!(cfg.jobs, Jobs::Auto);
            assert!(cfg.check_status);
            assert!(cfg.keep_going);
            assert_eq!(cfg.build.program(), "ninja");
            assert_eq!(cfg.build.extra_args(), ["-v".to_string()]);
            assert_eq!(cfg.configure, ToolConfig::new(&["cmake"]));
        }
    }

    #[test]
    fn rejects_empty_command() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[configure]\ncommand = []\n").expect("write");

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("configure.command"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "parallelism = 4\n").expect("write");

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn directory_in_place_of_config_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::create_dir(&path).expect("mkdir");

        assert!(load_config(&path).is_err());
    }
}
