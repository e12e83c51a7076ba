//! Cross-process file locking and atomic replacement
//!
//! Every CLI run opens its own stores, so in-process mutexes do not
//! serialize writers. Writers take an exclusive OS lock on a lock file that
//! sits next to the data it guards, and replace files through a uniquely
//! named temp file and a rename.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use uuid::Uuid;

/// Exclusive lock on a lock file, released on drop
#[derive(Debug)]
pub struct DirLock {
    file: File,
}

impl DirLock {
    /// Block until the lock at `path` is held, creating the file if needed
    pub fn acquire(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        FileExt::lock_exclusive(&file)?;
        Ok(Self { file })
    }
}

impl Drop for DirLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            log::warn!("Failed to release file lock: {}", e);
        }
    }
}

/// Temp file path next to `target`, unique to this writer
pub fn temp_path_for(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!("{}.{}.tmp", name, Uuid::new_v4().simple()))
}

/// Write `contents` to a fresh temp file beside `target` and return its path
pub fn stage(target: &Path, contents: &[u8]) -> io::Result<PathBuf> {
    let temp_path = temp_path_for(target);
    if let Err(e) = fs::write(&temp_path, contents) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(temp_path)
}

/// Replace `target` with `contents` so readers see either the old or the new file
pub fn write_atomic(target: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = stage(target, contents)?;
    if let Err(e) = fs::rename(&temp_path, target) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
