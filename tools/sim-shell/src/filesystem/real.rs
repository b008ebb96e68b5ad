use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use filetime::{set_file_mtime, FileTime};

use super::{EntryMetadata, FileSystem, Result};

/// Process-backed filesystem: `cd` really moves the process working directory.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn current_directory(&self) -> Result<PathBuf> {
        Ok(env::current_dir()?)
    }

    fn change_directory(&self, path: &Path) -> Result<()> {
        env::set_current_dir(path)?;
        Ok(())
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<EntryMetadata>> {
        let mut results = Vec::new();

        for entry in fs::read_dir(path)? {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue, // Skip entries we can't read
            };

            let path = entry.path();
            // Follow symlinks, the way stat(2) does
            let metadata = match fs::metadata(&path) {
                Ok(m) => m,
                Err(_) => continue,
            };

            let modified = match metadata.modified() {
                Ok(m) => m,
                Err(_) => SystemTime::UNIX_EPOCH,
            };

            results.push(EntryMetadata {
                path,
                modified,
                is_directory: metadata.is_dir(),
                len: metadata.len(),
            });
        }

        Ok(results)
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir(path)?;
        Ok(())
    }

    fn remove_directory(&self, path: &Path) -> Result<()> {
        fs::remove_dir(path)?;
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        Ok(path.exists())
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        OpenOptions::new().append(true).create(true).open(path)?;
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path)?;
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        fs::write(path, contents)?;
        Ok(())
    }

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()> {
        let file_time = FileTime::from(time);
        set_file_mtime(path, file_time)?;
        Ok(())
    }
}
