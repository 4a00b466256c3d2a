//! Launch-scoped temporary artifacts.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

/// Suffix shared by all launch-scoped config artifacts.
pub const CONF_EXTENSION: &str = ".conf";

/// Create a uniquely named empty config file under `root`.
///
/// The file is named `<purpose><random>.conf` and never reuses an existing
/// path. Creation failures (missing root, permissions, full disk) surface
/// as the underlying `io::Error`.
pub fn create_conf_file(root: &Path, purpose: &str) -> io::Result<PathBuf> {
    let (_file, path) = tempfile::Builder::new()
        .prefix(purpose)
        .suffix(CONF_EXTENSION)
        .tempfile_in(root)?
        .keep()
        .map_err(|e| e.error)?;
    Ok(path)
}

/// Paths created for one launch, in creation order.
///
/// The launcher never deletes these itself: the worker reads the files
/// after the build returns, so removal happens later, driven by whoever
/// owns the launch. Each created file appears exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Artifacts(Vec<PathBuf>);

impl Artifacts {
    /// Create an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a created path.
    pub fn push(&mut self, path: PathBuf) {
        self.0.push(path);
    }

    /// Number of recorded paths.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no artifact was created.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the recorded paths in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    /// View the recorded paths as a slice.
    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    /// Best-effort removal of every recorded file.
    ///
    /// Failures are logged and do not stop the sweep; a file that is
    /// already gone is not an error.
    pub fn delete_all(&self) {
        for path in &self.0 {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed launch artifact"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove launch artifact")
                }
            }
        }
    }
}
