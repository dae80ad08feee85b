//! Source file tracking
//!
//! A `SourceFile` remembers the modification time it last observed so the
//! engine can tell, cheaply and without reading contents, whether a reload
//! is due.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{EnvError, EnvResult};
use super::parser::{parse, SourceMap};

/// Result of comparing a source's recorded timestamp with the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Nothing changed since the last read
    Fresh,
    /// The file's timestamp moved past the recorded one
    Modified,
    /// The file existed at the last read and is gone now
    Deleted,
    /// The file was absent at the last read and exists now
    Appeared,
}

impl Staleness {
    /// Check if this state calls for a reload
    pub fn is_stale(&self) -> bool {
        !matches!(self, Staleness::Fresh)
    }

    /// Lowercase name used in log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            Staleness::Fresh => "fresh",
            Staleness::Modified => "modified",
            Staleness::Deleted => "deleted",
            Staleness::Appeared => "appeared",
        }
    }
}

/// One configured source file and its last observed timestamp
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl SourceFile {
    /// Track a source, resolving relative paths against the working directory
    ///
    /// The file does not need to exist.
    pub fn new(path: impl AsRef<Path>) -> EnvResult<Self> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map_err(|source| EnvError::Io {
                    path: path.to_path_buf(),
                    source,
                })?
                .join(path)
        };

        Ok(Self {
            path,
            modified: None,
        })
    }

    /// Absolute path of the source
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp recorded at the last read, `None` if the file was absent
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Check if the file existed at the last read
    pub fn was_present(&self) -> bool {
        self.modified.is_some()
    }

    /// Compare the recorded timestamp against the file on disk
    pub fn staleness(&self) -> Staleness {
        match (self.modified, disk_modified(&self.path)) {
            (Some(_), None) => Staleness::Deleted,
            (None, Some(_)) => Staleness::Appeared,
            (Some(seen), Some(now)) if now > seen => Staleness::Modified,
            _ => Staleness::Fresh,
        }
    }

    /// Read the file and record its timestamp
    ///
    /// Returns `Ok(None)` and clears the timestamp if the file is absent,
    /// including when it disappears between the stat and the read.
    pub fn load(&mut self) -> EnvResult<Option<SourceMap>> {
        let Some(modified) = disk_modified(&self.path) else {
            self.modified = None;
            return Ok(None);
        };

        let map = read_source(&self.path)?;
        self.modified = map.as_ref().map(|_| modified);
        Ok(map)
    }
}

/// Read and parse a source file
///
/// Returns `Ok(None)` if the file does not exist. Parse failures are
/// returned unchanged.
pub fn read_source(path: &Path) -> EnvResult<Option<SourceMap>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(EnvError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    parse(&content, path).map(Some)
}

fn disk_modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
}
