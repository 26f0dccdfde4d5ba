//! File-backed durable slot

use crate::core::{DurableSlot, LoggerError, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Slot stored as `<dir>/<key>.json`.
///
/// Writes go to a sibling temp file under an exclusive lock and are renamed
/// into place, so a reader never sees a half-written snapshot.
#[derive(Debug)]
pub struct FileSlot {
    key: String,
    path: PathBuf,
}

impl FileSlot {
    /// Open the slot for `key` inside `dir`, creating the directory if needed
    pub fn new(dir: impl AsRef<Path>, key: impl Into<String>) -> Result<Self> {
        let dir = dir.as_ref();
        let key = key.into();
        fs::create_dir_all(dir).map_err(|e| {
            LoggerError::io_operation(
                "opening durable slot",
                format!("cannot create directory {}", dir.display()),
                e,
            )
        })?;

        Ok(Self {
            path: dir.join(format!("{}.json", key)),
            key,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("json.lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }

    fn lock(&self) -> Result<File> {
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| LoggerError::io_operation("locking durable slot", self.key.clone(), e))?;
        lock_file
            .lock_exclusive()
            .map_err(|e| LoggerError::io_operation("locking durable slot", self.key.clone(), e))?;
        Ok(lock_file)
    }
}

impl DurableSlot for FileSlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LoggerError::io_operation(
                "reading durable slot",
                self.path.display().to_string(),
                e,
            )),
        }
    }

    fn write(&mut self, payload: &str) -> Result<()> {
        let lock = self.lock()?;
        let temp_path = self.temp_path();

        let result = (|| {
            let mut file = File::create(&temp_path)?;
            file.write_all(payload.as_bytes())?;
            file.sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        // Unlock before reporting so a failed write never leaves the slot locked
        let _ = FileExt::unlock(&lock);

        result.map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            LoggerError::io_operation("writing durable slot", self.path.display().to_string(), e)
        })
    }

    fn clear(&mut self) -> Result<()> {
        let lock = self.lock()?;
        let result = match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(LoggerError::io_operation(
                "clearing durable slot",
                self.path.display().to_string(),
                e,
            )),
            _ => Ok(()),
        };
        let _ = FileExt::unlock(&lock);
        result
    }
}
