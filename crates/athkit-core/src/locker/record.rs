//! Typed locker records.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use super::error::LockerError;
use super::kind::{Capability, LockerKind, LockerType};
use super::lookup::lookup_at_depth;
use super::quota::{LockerQuota, QuotaUnits};
use crate::ports::{AfsIntrospector, NamingService};

/// MUL lockers may reference other MUL lockers up to this depth.
pub const MAX_MUL_DEPTH: usize = 8;

/// A `(class, instance, recipient)` Zephyr subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZephyrTriplet {
    pub class: String,
    pub instance: String,
    pub recipient: String,
}

impl ZephyrTriplet {
    /// File-server notices for `instance`, addressed to everyone.
    pub fn filsrv(instance: impl Into<String>) -> Self {
        Self {
            class: "filsrv".to_string(),
            instance: instance.into(),
            recipient: "*".to_string(),
        }
    }
}

impl std::fmt::Display for ZephyrTriplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{},{},{}>", self.class, self.instance, self.recipient)
    }
}

/// One parsed filsys entry. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockerRecord {
    name: String,
    data: String,
    #[serde(flatten)]
    kind: LockerKind,
}

impl LockerRecord {
    /// Parse record `data` for a locker of type `locker_type`.
    ///
    /// `naming` is only consulted for MUL lockers, whose members are
    /// resolved recursively.
    pub fn parse(
        name: &str,
        locker_type: LockerType,
        data: &str,
        naming: &dyn NamingService,
    ) -> Result<Self, LockerError> {
        Self::parse_at_depth(name, locker_type, data, naming, 0)
    }

    pub(super) fn parse_at_depth(
        name: &str,
        locker_type: LockerType,
        data: &str,
        naming: &dyn NamingService,
        depth: usize,
    ) -> Result<Self, LockerError> {
        let kind = match locker_type {
            LockerType::Mul => {
                if depth >= MAX_MUL_DEPTH {
                    return Err(LockerError::NestingTooDeep {
                        name: name.to_string(),
                        limit: MAX_MUL_DEPTH,
                    });
                }
                let mut members = Vec::new();
                for member in data.split_whitespace() {
                    let preferred = lookup_at_depth(naming, member, depth + 1)?
                        .into_iter()
                        .next()
                        .ok_or_else(|| LockerError::NotFound {
                            name: member.to_string(),
                        })?;
                    members.push(preferred);
                }
                LockerKind::Mul { members }
            }
            fixed => {
                let parts: Vec<&str> = data.split(' ').collect();
                if Some(parts.len()) != fixed.field_count() {
                    return Err(LockerError::InvalidData {
                        name: name.to_string(),
                        kind: fixed.tag().to_string(),
                        data: data.to_string(),
                    });
                }
                match fixed {
                    LockerType::Afs => LockerKind::Afs {
                        path: PathBuf::from(parts[0]),
                        auth: parts[1].to_string(),
                        mountpoint: PathBuf::from(parts[2]),
                    },
                    LockerType::Nfs => LockerKind::Nfs {
                        path: PathBuf::from(parts[0]),
                        server: parts[1].to_string(),
                        auth: parts[2].to_string(),
                        mountpoint: PathBuf::from(parts[3]),
                    },
                    _ => LockerKind::Loc {
                        path: PathBuf::from(parts[0]),
                        auth: parts[1].to_string(),
                        mountpoint: PathBuf::from(parts[2]),
                    },
                }
            }
        };

        Ok(Self {
            name: name.to_string(),
            data: data.to_string(),
            kind,
        })
    }

    /// A LOC locker for a plain symlink `root/dst -> src`.
    pub fn from_symlink(src: &str, dst: &str, root: &Path) -> Self {
        let mountpoint = root.join(dst);
        Self {
            name: dst.to_string(),
            data: format!("{src} n {}", mountpoint.display()),
            kind: LockerKind::Loc {
                path: PathBuf::from(src),
                auth: "n".to_string(),
                mountpoint,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw record data as received.
    pub fn data(&self) -> &str {
        &self.data
    }

    pub const fn kind(&self) -> &LockerKind {
        &self.kind
    }

    pub const fn locker_type(&self) -> LockerType {
        self.kind.locker_type()
    }

    /// Where the locker's contents live.
    pub fn path(&self) -> Option<&Path> {
        match &self.kind {
            LockerKind::Afs { path, .. }
            | LockerKind::Nfs { path, .. }
            | LockerKind::Loc { path, .. } => Some(path),
            LockerKind::Mul { .. } => None,
        }
    }

    /// Where the locker gets attached.
    pub fn mountpoint(&self) -> Option<&Path> {
        match &self.kind {
            LockerKind::Afs { mountpoint, .. }
            | LockerKind::Nfs { mountpoint, .. }
            | LockerKind::Loc { mountpoint, .. } => Some(mountpoint),
            LockerKind::Mul { .. } => None,
        }
    }

    /// The record's auth/mode field (`w`, `r`, `n`, ...).
    pub fn auth(&self) -> Option<&str> {
        match &self.kind {
            LockerKind::Afs { auth, .. }
            | LockerKind::Nfs { auth, .. }
            | LockerKind::Loc { auth, .. } => Some(auth),
            LockerKind::Mul { .. } => None,
        }
    }

    pub const fn auth_supported(&self) -> bool {
        matches!(self.kind, LockerKind::Afs { .. })
    }

    /// AFS lockers with mode `w` need tokens to be usable.
    pub fn auth_required(&self) -> bool {
        self.auth_supported() && self.auth() == Some("w")
    }

    /// AFS lockers with mode `w` or `r` want tokens if available.
    pub fn auth_desired(&self) -> bool {
        self.auth_required() || (self.auth_supported() && self.auth() == Some("r"))
    }

    /// MUL members; empty for every other type.
    pub fn members(&self) -> &[Self] {
        match &self.kind {
            LockerKind::Mul { members } => members,
            _ => &[],
        }
    }

    pub fn automountable(&self) -> bool {
        self.mountpoint().is_some()
    }

    pub const fn supports(&self, capability: Capability) -> bool {
        self.locker_type().supports(capability)
    }

    fn require(&self, capability: Capability, operation: &'static str) -> Result<(), LockerError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(LockerError::not_supported(
                &self.name,
                self.locker_type().tag(),
                operation,
            ))
        }
    }

    /// Command line that obtains tokens for this locker.
    pub fn auth_command(&self) -> Result<Vec<String>, LockerError> {
        self.require(Capability::Authenticate, "authenticate")?;
        let path = self.path().unwrap_or_else(|| Path::new(""));
        Ok(vec![
            "aklog".to_string(),
            "-path".to_string(),
            path.display().to_string(),
        ])
    }

    /// Volume quota, in KiB.
    pub fn quota(&self, afs: &dyn AfsIntrospector) -> Result<LockerQuota, LockerError> {
        self.require(Capability::Quota, "getQuota()")?;
        let path = self.path().unwrap_or_else(|| Path::new(""));
        let status = afs.examine(path).map_err(|source| LockerError::Quota {
            name: self.name.clone(),
            path: path.to_path_buf(),
            source,
        })?;
        Ok(LockerQuota::new(
            status.blocks_in_use,
            status.max_quota,
            QuotaUnits::Binary,
        ))
    }

    /// Hostnames of the servers holding this locker.
    ///
    /// For AFS a failed lookup yields an empty list.
    pub fn file_servers(&self, afs: &dyn AfsIntrospector) -> Result<Vec<String>, LockerError> {
        self.require(Capability::FileServers, "getFileServers()")?;
        match &self.kind {
            LockerKind::Nfs { server, .. } => Ok(vec![server.clone()]),
            LockerKind::Afs { path, .. } => Ok(afs.where_is(path).unwrap_or_else(|e| {
                debug!("whereis failed for {}: {e}", path.display());
                Vec::new()
            })),
            _ => Ok(Vec::new()),
        }
    }

    /// Zephyr subscriptions for file-server notices about this locker.
    ///
    /// Introspection failures drop the affected triplets instead of
    /// failing the call.
    pub fn zephyr_triplets(
        &self,
        afs: &dyn AfsIntrospector,
    ) -> Result<Vec<ZephyrTriplet>, LockerError> {
        self.require(Capability::ZephyrSubscriptions, "getZephyrTriplets()")?;
        let path = self.path().unwrap_or_else(|| Path::new(""));
        let mut triplets = Vec::new();

        match afs.which_cell(path) {
            Ok(cell) => {
                triplets.push(ZephyrTriplet::filsrv(format!("{cell}:root.cell")));
                triplets.push(ZephyrTriplet::filsrv(cell.clone()));
                match afs.examine(path) {
                    Ok(volume) => {
                        triplets.push(ZephyrTriplet::filsrv(format!("{cell}:{}", volume.name)));
                        if let Some(parent) = path.parent() {
                            match afs.examine(parent) {
                                Ok(parent_volume) => {
                                    let name = parent_volume
                                        .name
                                        .strip_suffix(".readonly")
                                        .unwrap_or(&parent_volume.name);
                                    triplets.push(ZephyrTriplet::filsrv(format!("{cell}:{name}")));
                                }
                                Err(e) => debug!("examine failed for {}: {e}", parent.display()),
                            }
                        }
                    }
                    Err(e) => debug!("examine failed for {}: {e}", path.display()),
                }
            }
            Err(e) => debug!("whichcell failed for {}: {e}", path.display()),
        }

        for server in self.file_servers(afs)? {
            triplets.push(ZephyrTriplet::filsrv(server.to_lowercase()));
        }
        Ok(triplets)
    }

    /// Attach-table line: `name:TYPE:data`.
    pub fn attachtab_line(&self) -> String {
        format!("{}:{}:{}", self.name, self.locker_type(), self.data)
    }
}

impl std::fmt::Display for LockerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LockerKind::Nfs {
                path,
                server,
                mountpoint,
                ..
            } => write!(f, "{} -> {server}:{}", mountpoint.display(), path.display()),
            LockerKind::Afs {
                path, mountpoint, ..
            }
            | LockerKind::Loc {
                path, mountpoint, ..
            } => write!(f, "{} -> {}", mountpoint.display(), path.display()),
            LockerKind::Mul { members } => {
                let rendered: Vec<String> = members
                    .iter()
                    .map(|m| format!("{} {} ({m})", m.locker_type(), m.name()))
                    .collect();
                f.write_str(&rendered.join(", "))
            }
        }
    }
}
