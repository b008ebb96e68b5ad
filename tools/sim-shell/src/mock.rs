use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::clock::TimeSource;
use crate::console::Console;
use crate::filesystem::{EntryMetadata, FileSystem, FileSystemError, Result};

#[derive(Debug, Clone)]
struct MockFile {
    content: Vec<u8>,
    modified: SystemTime,
}

/// In-memory filesystem rooted at `/` with its own working directory.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, MockFile>>>,
    directories: Arc<Mutex<BTreeMap<PathBuf, SystemTime>>>,
    cwd: Arc<Mutex<PathBuf>>,
    read_only: Arc<Mutex<bool>>,
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut directories = BTreeMap::new();
        directories.insert(PathBuf::from("/"), SystemTime::UNIX_EPOCH);

        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            directories: Arc::new(Mutex::new(directories)),
            cwd: Arc::new(Mutex::new(PathBuf::from("/"))),
            read_only: Arc::new(Mutex::new(false)),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: Vec<u8>, modified: SystemTime) {
        let path = self.resolve(path.as_ref());
        if let Some(parent) = path.parent() {
            self.add_directory(parent);
        }
        let mut files = self.files.lock().unwrap();
        files.insert(path, MockFile { content, modified });
    }

    /// Adds `path` and any missing ancestors.
    pub fn add_directory(&self, path: impl AsRef<Path>) {
        let path = self.resolve(path.as_ref());
        let mut directories = self.directories.lock().unwrap();
        for ancestor in path.ancestors() {
            directories
                .entry(ancestor.to_path_buf())
                .or_insert(SystemTime::UNIX_EPOCH);
        }
    }

    pub fn set_directory_modified(&self, path: impl AsRef<Path>, modified: SystemTime) {
        let path = self.resolve(path.as_ref());
        let mut directories = self.directories.lock().unwrap();
        directories.insert(path, modified);
    }

    pub fn get_file_content(&self, path: &Path) -> Option<Vec<u8>> {
        let path = self.resolve(path);
        let files = self.files.lock().unwrap();
        files.get(&path).map(|f| f.content.clone())
    }

    pub fn get_file_modified(&self, path: &Path) -> Option<SystemTime> {
        let path = self.resolve(path);
        let files = self.files.lock().unwrap();
        files.get(&path).map(|f| f.modified)
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        let path = self.resolve(path);
        self.directories.lock().unwrap().contains_key(&path)
    }

    /// Makes every subsequent `write_file` fail with a permission error.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.lock().unwrap() = read_only;
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.lock().unwrap().join(path)
        };

        let mut normalized = PathBuf::from("/");
        for component in joined.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::Normal(part) => normalized.push(part),
                Component::RootDir | Component::CurDir | Component::Prefix(_) => {}
            }
        }
        normalized
    }

    fn require_parent(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or(Path::new("/"));
        if self.directories.lock().unwrap().contains_key(parent) {
            Ok(())
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }
}

impl FileSystem for MockFileSystem {
    fn current_directory(&self) -> Result<PathBuf> {
        Ok(self.cwd.lock().unwrap().clone())
    }

    fn change_directory(&self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target) {
            *self.cwd.lock().unwrap() = target;
            Ok(())
        } else if self.files.lock().unwrap().contains_key(&target) {
            Err(FileSystemError::NotADirectory(path.to_path_buf()))
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<EntryMetadata>> {
        let path = self.resolve(path);
        let files = self.files.lock().unwrap();
        let directories = self.directories.lock().unwrap();

        if !directories.contains_key(&path) {
            return Err(FileSystemError::NotFound(path));
        }

        let mut results = Vec::new();

        for (file_path, file) in files.iter() {
            if file_path.parent() == Some(path.as_path()) {
                results.push(EntryMetadata {
                    path: file_path.clone(),
                    modified: file.modified,
                    is_directory: false,
                    len: file.content.len() as u64,
                });
            }
        }

        for (dir_path, modified) in directories.iter() {
            if dir_path.parent() == Some(path.as_path()) {
                results.push(EntryMetadata {
                    path: dir_path.clone(),
                    modified: *modified,
                    is_directory: true,
                    len: 0,
                });
            }
        }

        Ok(results)
    }

    fn create_directory(&self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target)
            || self.files.lock().unwrap().contains_key(&target)
        {
            return Err(FileSystemError::AlreadyExists(path.to_path_buf()));
        }
        self.require_parent(&target)?;
        self.directories
            .lock()
            .unwrap()
            .insert(target, SystemTime::now());
        Ok(())
    }

    fn remove_directory(&self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        if self.files.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::NotADirectory(path.to_path_buf()));
        }
        if !self.directories.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::NotFound(path.to_path_buf()));
        }
        if !self.list_directory(&target)?.is_empty() {
            return Err(FileSystemError::DirectoryNotEmpty(path.to_path_buf()));
        }
        self.directories.lock().unwrap().remove(&target);
        Ok(())
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let target = self.resolve(path);
        let files = self.files.lock().unwrap();
        let directories = self.directories.lock().unwrap();

        Ok(files.contains_key(&target) || directories.contains_key(&target))
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::IsADirectory(path.to_path_buf()));
        }
        self.require_parent(&target)?;
        let mut files = self.files.lock().unwrap();
        files.entry(target).or_insert_with(|| MockFile {
            content: Vec::new(),
            modified: SystemTime::now(),
        });
        Ok(())
    }

    fn delete_file(&self, path: &Path) -> Result<()> {
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::IsADirectory(path.to_path_buf()));
        }
        self.files
            .lock()
            .unwrap()
            .remove(&target)
            .map(|_| ())
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::IsADirectory(path.to_path_buf()));
        }
        self.files
            .lock()
            .unwrap()
            .get(&target)
            .map(|f| f.content.clone())
            .ok_or_else(|| FileSystemError::NotFound(path.to_path_buf()))
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if *self.read_only.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied").into());
        }
        let target = self.resolve(path);
        if self.directories.lock().unwrap().contains_key(&target) {
            return Err(FileSystemError::IsADirectory(path.to_path_buf()));
        }
        self.require_parent(&target)?;
        self.files.lock().unwrap().insert(
            target,
            MockFile {
                content: contents.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn set_modified_time(&self, path: &Path, time: SystemTime) -> Result<()> {
        let target = self.resolve(path);
        let mut files = self.files.lock().unwrap();

        if let Some(file) = files.get_mut(&target) {
            file.modified = time;
            Ok(())
        } else {
            Err(FileSystemError::NotFound(path.to_path_buf()))
        }
    }
}

/// Time source frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl TimeSource for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A cloneable in-memory writer, so tests can inspect what a `Console` printed.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A console fed from `input`, returning handles to its output and error streams.
pub fn scripted_console(input: impl AsRef<[u8]>) -> (Console, SharedBuffer, SharedBuffer) {
    let output = SharedBuffer::new();
    let errors = SharedBuffer::new();
    let console = Console::new(
        Box::new(Cursor::new(input.as_ref().to_vec())),
        Box::new(output.clone()),
        Box::new(errors.clone()),
    );
    (console, output, errors)
}
