use crate::core::error::Result;
use std::path::{Path, PathBuf};

/// Abstraction for file system operations.
pub trait FileSystem: Send + Sync {
    /// Recursively list files below `root` whose name ends with `suffix`.
    /// Unreadable directories are skipped, not reported as errors.
    fn list_files(&self, root: &Path, suffix: &str) -> Vec<PathBuf>;
    /// Read a file to a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Write a string to a file.
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    /// Check if a directory exists.
    fn is_dir(&self, path: &Path) -> bool;
    /// Create a directory and all of its parents.
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a directory tree. Succeeds when the directory is already absent.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
}
