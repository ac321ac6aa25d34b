//! Clean and recreate the build output directory.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::RebuildError;

/// Remove `path` recursively if present, then create it empty.
///
/// Absence of `path` is not an error. The parent must already exist: the
/// directory is created non-recursively so a mistyped root fails loudly
/// instead of materializing a new tree.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn reset_build_dir(path: &Path) -> Result<(), RebuildError> {
    clean_build_dir(path)?;
    create_build_dir(path)
}

/// Remove `path` and everything below it. Succeeds if it does not exist.
pub fn clean_build_dir(path: &Path) -> Result<(), RebuildError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("build directory absent, nothing to clean");
            return Ok(());
        }
        Err(err) => return Err(RebuildError::filesystem("inspect", path, err)),
    };
    if !metadata.is_dir() {
        return Err(RebuildError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    info!("removing build directory");
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(RebuildError::filesystem("remove", path, err)),
    }
}

/// Create `path` as a new empty directory.
pub fn create_build_dir(path: &Path) -> Result<(), RebuildError> {
    debug!("creating build directory");
    fs::create_dir(path).map_err(|err| RebuildError::filesystem("create", path, err))
}
