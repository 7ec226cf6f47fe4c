//! AFS filesystem-introspection port.
//!
//! Callers treat every failure here as non-fatal and degrade their output.

use std::io;
use std::path::Path;

/// The subset of `fs examine` output the locker code needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeStatus {
    pub name: String,
    /// Blocks in use, in KiB.
    pub blocks_in_use: u64,
    /// Quota in KiB, `0` meaning unlimited.
    pub max_quota: u64,
}

#[cfg_attr(test, mockall::automock)]
pub trait AfsIntrospector: Send + Sync {
    /// Cell serving `path`.
    fn which_cell(&self, path: &Path) -> io::Result<String>;

    /// Volume status for the volume containing `path`.
    fn examine(&self, path: &Path) -> io::Result<VolumeStatus>;

    /// Hostnames of the file servers holding `path`.
    fn where_is(&self, path: &Path) -> io::Result<Vec<String>>;
}
