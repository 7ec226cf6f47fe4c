//! Locker types and their capabilities.

use std::path::PathBuf;

use serde::Serialize;

use super::record::LockerRecord;

/// Filesystem type tag from a filsys record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LockerType {
    Afs,
    Nfs,
    /// Plain local symlink.
    Loc,
    /// List of other lockers, by name.
    Mul,
}

/// Operations a locker type may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Attach,
    Detach,
    Authenticate,
    Quota,
    FileServers,
    ZephyrSubscriptions,
}

impl LockerType {
    pub const ALL: [Self; 4] = [Self::Afs, Self::Nfs, Self::Loc, Self::Mul];

    pub const fn tag(self) -> &'static str {
        match self {
            Self::Afs => "AFS",
            Self::Nfs => "NFS",
            Self::Loc => "LOC",
            Self::Mul => "MUL",
        }
    }

    /// Parse a record type tag; `None` for unsupported types.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.tag() == tag)
    }

    /// Space-separated field count of the record data, if fixed.
    pub const fn field_count(self) -> Option<usize> {
        match self {
            Self::Afs | Self::Loc => Some(3),
            Self::Nfs => Some(4),
            Self::Mul => None,
        }
    }

    pub const fn supports(self, capability: Capability) -> bool {
        match self {
            Self::Afs => true,
            Self::Nfs => matches!(
                capability,
                Capability::Attach | Capability::Detach | Capability::FileServers
            ),
            Self::Loc => matches!(capability, Capability::Attach | Capability::Detach),
            Self::Mul => false,
        }
    }
}

impl std::fmt::Display for LockerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

/// Type-specific fields parsed from the record data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum LockerKind {
    /// `path auth mountpoint`
    Afs {
        path: PathBuf,
        auth: String,
        mountpoint: PathBuf,
    },
    /// `path server auth mountpoint`
    Nfs {
        path: PathBuf,
        server: String,
        auth: String,
        mountpoint: PathBuf,
    },
    /// `path auth mountpoint`; the auth field is carried but unused.
    Loc {
        path: PathBuf,
        auth: String,
        mountpoint: PathBuf,
    },
    /// Member lockers, each resolved to its preferred record.
    Mul { members: Vec<LockerRecord> },
}

impl LockerKind {
    pub const fn locker_type(&self) -> LockerType {
        match self {
            Self::Afs { .. } => LockerType::Afs,
            Self::Nfs { .. } => LockerType::Nfs,
            Self::Loc { .. } => LockerType::Loc,
            Self::Mul { .. } => LockerType::Mul,
        }
    }
}
