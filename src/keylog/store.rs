// ============================================================================
// src/keylog/store.rs – append-only key log on disk
// ============================================================================

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::error::LogFileError;

/// Handle to the single log file. Holds no open descriptor: every append
/// opens, writes, flushes and closes, so a crash loses at most one line.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, line: &str) -> Result<(), LogFileError> {
        let err = |source| LogFileError::Append {
            path: self.path.clone(),
            source,
        };

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).map_err(err)?;
        file.write_all(line.as_bytes()).map_err(err)?;
        file.flush().map_err(err)?;
        Ok(())
    }

    /// Whole file as UTF-8, or `None` when it does not exist.
    pub fn read_to_string(&self) -> Result<Option<String>, LogFileError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(LogFileError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Delete the file. Returns `false` when there was nothing to delete.
    pub fn remove(&self) -> Result<bool, LogFileError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(source) => Err(LogFileError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
