//! Resolving locker names through the naming service.

use tracing::debug;

use super::error::LockerError;
use super::kind::LockerType;
use super::record::LockerRecord;
use crate::ports::{FilsysEntry, NamingError, NamingService};

/// Fetch raw filsys entries for `name`, most preferred first.
///
/// Names starting with `.` are rejected up front; the naming service
/// would only produce a confusing error for them.
pub fn resolve(naming: &dyn NamingService, name: &str) -> Result<Vec<FilsysEntry>, LockerError> {
    if name.starts_with('.') {
        return Err(LockerError::InvalidName(name.to_string()));
    }
    let mut entries = naming.resolve_filsys(name).map_err(|e| match e {
        NamingError::NotFound(_) => LockerError::NotFound {
            name: name.to_string(),
        },
        NamingError::Failed(message) => LockerError::Resolution {
            name: name.to_string(),
            message,
        },
    })?;
    entries.sort_by_key(|e| e.priority);
    Ok(entries)
}

/// Resolve `name` into typed locker records, most preferred first.
pub fn lookup(naming: &dyn NamingService, name: &str) -> Result<Vec<LockerRecord>, LockerError> {
    lookup_at_depth(naming, name, 0)
}

pub(super) fn lookup_at_depth(
    naming: &dyn NamingService,
    name: &str,
    depth: usize,
) -> Result<Vec<LockerRecord>, LockerError> {
    debug!("Looking up {name}");
    let mut records = Vec::new();
    for entry in resolve(naming, name)? {
        if entry.kind == "ERR" {
            return Err(LockerError::Unavailable {
                name: name.to_string(),
                message: entry.data,
            });
        }
        let locker_type =
            LockerType::from_tag(&entry.kind).ok_or_else(|| LockerError::NotSupported {
                name: name.to_string(),
                kind: entry.kind.clone(),
                operation: None,
            })?;
        records.push(LockerRecord::parse_at_depth(
            name,
            locker_type,
            &entry.data,
            naming,
            depth,
        )?);
    }
    Ok(records)
}
