mod real;

pub use real::RealFileSystem;

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileSystemError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Directory not empty: {}", .0.display())]
    DirectoryNotEmpty(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Is a directory: {}", .0.display())]
    IsADirectory(PathBuf),
}

pub type Result<T> = std::result::Result<T, FileSystemError>;

#[derive(Debug, Clone)]
pub struct EntryMetadata {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub is_directory: bool,
    pub len: u64,
}

impl EntryMetadata {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// The operating-system services the shell commands are built on.
///
/// Relative paths are resolved against the implementation's notion of the
/// current working directory.
pub trait FileSystem: Send + Sync {
    fn current_directory(&self) -> Result<PathBuf>;

    fn change_directory(&self, path: &Path) -> Result<()>;

    /// Entries of `path`, excluding `.` and `..`.
    fn list_directory(&self, path: &Path) -> Result<Vec<EntryMetadata>>;

    fn create_directory(&self, path: &Path) -> Result<()>;

    /// Removes an empty directory.
    fn remove_directory(&self, path: &Path) -> Result<()>;

    fn exists(&self, path: &Path) -> Result<bool>;

    /// Opens `path` for appending, creating it empty if it is missing.
    fn create_file(&self, path: &Path) -> Result<()>;

    fn delete_file(&self, path: &Path) -> Result<()>;

    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replaces the contents of `path`, creating it if needed.
    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()>;

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()>;
}
