//! # Line Files
//!
//! Append-only text files holding one sealed line per `\r\n`-terminated row.
//! Appends report the previous length so a failed multi-file write can be
//! rolled back with [`LineFile::truncate`].

use crate::domain::errors::StoreError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const TERMINATOR: &str = "\r\n";

/// A line-oriented file on disk.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
}

impl LineFile {
    /// Open `path`, creating it empty when absent.
    ///
    /// Returns the file and whether it was just created.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<(Self, bool), StoreError> {
        let path = path.into();
        let created = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                file.sync_all().map_err(|e| StoreError::io(&path, e))?;
                true
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => false,
            Err(e) => return Err(StoreError::io(&path, e)),
        };
        Ok((Self { path }, created))
    }

    /// Path of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents.
    pub fn contents(&self) -> Result<Vec<u8>, StoreError> {
        fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))
    }

    /// Non-empty lines, terminators stripped.
    pub fn read_lines(&self) -> Result<Vec<String>, StoreError> {
        let text =
            fs::read_to_string(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect())
    }

    /// Append `line` plus terminator and flush to disk.
    ///
    /// Returns the file length before the append.
    pub fn append_line(&self, line: &str) -> Result<u64, StoreError> {
        if line.contains(['\r', '\n']) {
            return Err(StoreError::Unencodable {
                reason: "line contains a terminator".to_string(),
            });
        }

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        let previous = file
            .metadata()
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();

        let mut row = String::with_capacity(line.len() + TERMINATOR.len());
        row.push_str(line);
        row.push_str(TERMINATOR);
        file.write_all(row.as_bytes())
            .and_then(|_| file.sync_data())
            .map_err(|e| StoreError::io(&self.path, e))?;
        Ok(previous)
    }

    /// Cut the file back to `len` bytes.
    pub fn truncate(&self, len: u64) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?;
        file.set_len(len)
            .and_then(|_| file.sync_data())
            .map_err(|e| StoreError::io(&self.path, e))
    }
}
