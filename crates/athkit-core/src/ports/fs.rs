//! Filesystem probe used by the athdir search.

use std::path::Path;

/// Existence checks for candidate directories (injectable for testing).
pub trait FsProbe {
    fn exists(&self, path: &Path) -> bool;
}

/// Production probe backed by the real filesystem.
pub struct SystemFs;

impl FsProbe for SystemFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Test/mock filesystem probe with a fixed set of existing paths.
#[cfg(test)]
#[derive(Default)]
pub struct MockFs {
    existing: std::collections::HashSet<std::path::PathBuf>,
}

#[cfg(test)]
impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_existing(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.existing.insert(path.into());
        self
    }
}

#[cfg(test)]
impl FsProbe for MockFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing.contains(path)
    }
}
