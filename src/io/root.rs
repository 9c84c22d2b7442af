use std::path::{Path, PathBuf};

use crate::io::store::{Store, StoreError};

/// Name of the per-project data directory
pub const ROOT_DIR: &str = ".tada";

/// Error type for locating or creating a project root
#[derive(Debug, thiserror::Error)]
pub enum RootError {
    #[error("no {ROOT_DIR} folder found in this or any parent directory (run `tada init`)")]
    NotFound,
    #[error("{0} already exists")]
    AlreadyInitialized(PathBuf),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Walk up from `start` looking for a `.tada` directory and return its path.
pub fn discover_root(start: &Path) -> Result<PathBuf, RootError> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(ROOT_DIR);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        if !current.pop() {
            return Err(RootError::NotFound);
        }
    }
}

/// Create `.tada/` with its `tasks/` and `archive/` trees inside `dir`.
pub fn init_root(dir: &Path) -> Result<Store, RootError> {
    let root = dir.join(ROOT_DIR);
    if root.is_dir() {
        return Err(RootError::AlreadyInitialized(root));
    }
    let store = Store::new(root);
    store.ensure_directories()?;
    log::info!("initialized {}", store.root().display());
    Ok(store)
}
