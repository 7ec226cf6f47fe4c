//! Locker error types.
//!
//! Every variant that concerns a specific locker carries its name so
//! messages stay unambiguous when several lockers are processed at once.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving, parsing, attaching or inspecting lockers.
#[derive(Debug, Error)]
pub enum LockerError {
    /// The naming service has no record for this locker.
    #[error("{name}: Locker unknown.")]
    NotFound { name: String },

    /// The locker exists but its record says it is unavailable.
    #[error("{name}: {message}")]
    Unavailable { name: String, message: String },

    /// The locker type, or this operation on it, is not supported.
    #[error("{name}: {}", unsupported_message(.kind, .operation))]
    NotSupported {
        name: String,
        kind: String,
        operation: Option<&'static str>,
    },

    /// The record data does not match the layout for its type.
    #[error("{name}: Invalid {kind} locker data ({data})")]
    InvalidData {
        name: String,
        kind: String,
        data: String,
    },

    /// MUL lockers nested beyond the supported depth (usually a cycle).
    #[error("{name}: MUL locker nesting exceeds {limit} levels")]
    NestingTooDeep { name: String, limit: usize },

    /// The name can never be resolved (e.g. starts with `.`).
    #[error("Invalid locker name: {0}")]
    InvalidName(String),

    #[error("{name}: mountpoint {} is not under {}", .mountpoint.display(), .root.display())]
    InvalidMountpoint {
        name: String,
        mountpoint: PathBuf,
        root: PathBuf,
    },

    /// Something else is already linked at the mountpoint.
    #[error("{name}: {} already attached on {}", .existing.display(), .mountpoint.display())]
    AlreadyAttached {
        name: String,
        existing: PathBuf,
        mountpoint: PathBuf,
    },

    #[error("{name}: {source} while {action}")]
    Io {
        name: String,
        action: &'static str,
        #[source]
        source: io::Error,
    },

    /// The naming service failed for reasons other than a missing name.
    #[error("Hesiod Error: {message} while resolving {name}")]
    Resolution { name: String, message: String },

    #[error("{name}: Error getting AFS quota: {}: {source}", .path.display())]
    Quota {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read attachtab: {0}")]
    Attachtab(#[from] AttachtabError),

    /// No attach-table entry matches the name or mountpoint.
    #[error("{0}: Locker not attached.")]
    NotAttached(String),
}

fn unsupported_message(kind: &str, operation: &Option<&str>) -> String {
    match operation {
        Some(op) => format!("'{op}' operation not supported for '{kind}' lockers."),
        None => format!("'{kind}' lockers are not supported."),
    }
}

impl LockerError {
    pub(crate) fn not_supported(name: &str, kind: &str, operation: &'static str) -> Self {
        Self::NotSupported {
            name: name.to_string(),
            kind: kind.to_string(),
            operation: Some(operation),
        }
    }

    pub(crate) fn io(name: &str, action: &'static str, source: io::Error) -> Self {
        Self::Io {
            name: name.to_string(),
            action,
            source,
        }
    }

    /// Name of the locker this error is about, when known.
    pub fn locker_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name }
            | Self::Unavailable { name, .. }
            | Self::NotSupported { name, .. }
            | Self::InvalidData { name, .. }
            | Self::NestingTooDeep { name, .. }
            | Self::InvalidMountpoint { name, .. }
            | Self::AlreadyAttached { name, .. }
            | Self::Io { name, .. }
            | Self::Resolution { name, .. }
            | Self::Quota { name, .. } => Some(name),
            Self::InvalidName(name) | Self::NotAttached(name) => Some(name),
            Self::Attachtab(_) => None,
        }
    }
}

/// Problems loading the persisted attach table.
#[derive(Debug, Error)]
pub enum AttachtabError {
    #[error("{}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: malformed entry '{text}'")]
    Malformed { line: usize, text: String },

    #[error("line {line}: unknown locker type '{kind}'")]
    UnknownType { line: usize, kind: String },

    #[error("line {line}: duplicate entry for {}", .mountpoint.display())]
    Duplicate { line: usize, mountpoint: PathBuf },

    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: Box<LockerError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_supported_messages() {
        let err = LockerError::not_supported("sipb", "LOC", "getQuota()");
        assert_eq!(
            err.to_string(),
            "sipb: 'getQuota()' operation not supported for 'LOC' lockers."
        );

        let err = LockerError::NotSupported {
            name: "old".to_string(),
            kind: "UFS".to_string(),
            operation: None,
        };
        assert_eq!(err.to_string(), "old: 'UFS' lockers are not supported.");
        assert_eq!(err.locker_name(), Some("old"));
    }

    #[test]
    fn io_errors_name_the_locker() {
        let err = LockerError::io(
            "sipb",
            "detaching",
            io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert_eq!(err.to_string(), "sipb: Permission denied while detaching");
    }
}
