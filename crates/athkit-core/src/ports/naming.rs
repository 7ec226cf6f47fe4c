//! Naming-service port (Hesiod-style filsys lookups).

use serde::Serialize;
use thiserror::Error;

/// One filsys record returned by the naming service.
///
/// For multi-entry ("FSGROUP") results `priority` orders the entries;
/// lower values are preferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilsysEntry {
    pub priority: u32,
    /// Type tag such as `AFS`, `NFS`, `LOC`, `MUL` or `ERR`.
    pub kind: String,
    pub data: String,
}

impl FilsysEntry {
    pub fn new(priority: u32, kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            priority,
            kind: kind.into(),
            data: data.into(),
        }
    }
}

/// Errors reported by a naming service.
#[derive(Debug, Error)]
pub enum NamingError {
    /// The name has no records.
    #[error("{0} not found")]
    NotFound(String),

    /// The lookup itself failed (transport, malformed answer, ...).
    #[error("{0}")]
    Failed(String),
}

/// Port for resolving locker names to filsys records.
#[cfg_attr(test, mockall::automock)]
pub trait NamingService: Send + Sync {
    fn resolve_filsys(&self, name: &str) -> Result<Vec<FilsysEntry>, NamingError>;
}

/// Naming service used when none is configured; every lookup fails.
pub struct OfflineNaming;

impl NamingService for OfflineNaming {
    fn resolve_filsys(&self, name: &str) -> Result<Vec<FilsysEntry>, NamingError> {
        Err(NamingError::Failed(format!(
            "no naming service configured to resolve {name}"
        )))
    }
}
