//! File-backed naming service.
//!
//! Each non-comment line is `name:priority:TYPE:data`, for example
//!
//! ```text
//! # locker database
//! tools:0:AFS:/afs/athena.mit.edu/software/tools w /mit/tools
//! scratch:1:LOC:/var/scratch n /mit/scratch
//! ```
//!
//! Repeated names form a multi-entry result.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use athkit_core::{FilsysEntry, NamingError, NamingService};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FilsysFileError {
    #[error("Failed to read filsys database {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Line {line}: expected name:priority:TYPE:data, got '{text}'")]
    Malformed { line: usize, text: String },

    #[error("Line {line}: invalid priority '{value}'")]
    InvalidPriority { line: usize, value: String },
}

/// Filsys records loaded from a flat file.
#[derive(Debug, Clone, Default)]
pub struct FilsysFile {
    entries: HashMap<String, Vec<FilsysEntry>>,
}

impl FilsysFile {
    pub fn load(path: &Path) -> Result<Self, FilsysFileError> {
        let contents = fs::read_to_string(path).map_err(|source| FilsysFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self::parse(&contents)?;
        debug!("Loaded {} lockers from {}", db.len(), path.display());
        Ok(db)
    }

    pub fn parse(contents: &str) -> Result<Self, FilsysFileError> {
        let mut entries: HashMap<String, Vec<FilsysEntry>> = HashMap::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }

            let mut parts = text.splitn(4, ':');
            let (Some(name), Some(priority), Some(kind), Some(data)) =
                (parts.next(), parts.next(), parts.next(), parts.next())
            else {
                return Err(FilsysFileError::Malformed {
                    line,
                    text: text.to_string(),
                });
            };
            if name.is_empty() || kind.is_empty() {
                return Err(FilsysFileError::Malformed {
                    line,
                    text: text.to_string(),
                });
            }
            let priority = priority
                .parse()
                .map_err(|_| FilsysFileError::InvalidPriority {
                    line,
                    value: priority.to_string(),
                })?;

            entries
                .entry(name.to_string())
                .or_default()
                .push(FilsysEntry::new(priority, kind, data));
        }
        Ok(Self { entries })
    }

    /// Number of distinct locker names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl NamingService for FilsysFile {
    fn resolve_filsys(&self, name: &str) -> Result<Vec<FilsysEntry>, NamingError> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| NamingError::NotFound(name.to_string()))
    }
}
