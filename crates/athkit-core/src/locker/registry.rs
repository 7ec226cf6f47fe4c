//! Attaching and detaching lockers under the namespace root.
//!
//! Attach/detach are plain symlink operations and are not atomic: two
//! callers attaching the same mountpoint concurrently can race between
//! the "check existing link", "remove" and "recreate" steps. Callers must
//! serialize operations on one mountpoint themselves.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use super::attachtab::AttachTable;
use super::error::LockerError;
use super::lookup;
use super::record::LockerRecord;
use crate::ports::{FilsysEntry, NamingService};

/// Where lockers are attached by default.
pub const DEFAULT_NAMESPACE_ROOT: &str = "/mit";
/// Attach-table file name inside the namespace root.
pub const ATTACHTAB_FILE: &str = ".attachtab";

/// Locker settings fixed for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockerConfig {
    /// Every mountpoint must lie under this directory.
    pub namespace_root: PathBuf,
}

impl LockerConfig {
    pub fn new(namespace_root: impl Into<PathBuf>) -> Self {
        Self {
            namespace_root: namespace_root.into(),
        }
    }

    pub fn attachtab_path(&self) -> PathBuf {
        self.namespace_root.join(ATTACHTAB_FILE)
    }
}

impl Default for LockerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE_ROOT)
    }
}

/// Resolves lockers and manages their symlinks.
pub struct LockerRegistry<'a> {
    config: LockerConfig,
    naming: &'a dyn NamingService,
}

impl<'a> LockerRegistry<'a> {
    pub fn new(config: LockerConfig, naming: &'a dyn NamingService) -> Self {
        Self { config, naming }
    }

    pub const fn config(&self) -> &LockerConfig {
        &self.config
    }

    /// Raw filsys entries for `name`, most preferred first.
    pub fn resolve(&self, name: &str) -> Result<Vec<FilsysEntry>, LockerError> {
        lookup::resolve(self.naming, name)
    }

    /// Typed records for `name`, most preferred first.
    pub fn lookup(&self, name: &str) -> Result<Vec<LockerRecord>, LockerError> {
        lookup::lookup(self.naming, name)
    }

    /// Load `<root>/.attachtab`.
    pub fn attachtab(&self) -> Result<AttachTable, LockerError> {
        AttachTable::load(&self.config, self.naming)
    }

    /// The mountpoint must name an entry strictly below the root, with no
    /// `.` or `..` components that could lead back out of it.
    fn check_mountpoint(
        &self,
        record: &LockerRecord,
        mountpoint: &Path,
    ) -> Result<(), LockerError> {
        let lexical = mountpoint
            .components()
            .all(|c| !matches!(c, Component::ParentDir | Component::CurDir));
        if lexical
            && mountpoint != self.config.namespace_root.as_path()
            && mountpoint.starts_with(&self.config.namespace_root)
        {
            Ok(())
        } else {
            Err(LockerError::InvalidMountpoint {
                name: record.name().to_string(),
                mountpoint: mountpoint.to_path_buf(),
                root: self.config.namespace_root.clone(),
            })
        }
    }

    /// Link the locker's mountpoint to its path.
    ///
    /// An existing entry at the mountpoint is fine if it already resolves
    /// to the locker's path. With `force` it is removed and the link is
    /// created again (once).
    pub fn attach(&self, record: &LockerRecord, force: bool) -> Result<(), LockerError> {
        debug!("Attempting to attach {}...", record.name());
        let (Some(path), Some(mountpoint)) = (record.path(), record.mountpoint()) else {
            return Err(LockerError::not_supported(
                record.name(),
                record.locker_type().tag(),
                "attach",
            ));
        };
        self.check_mountpoint(record, mountpoint)?;

        match symlink(path, mountpoint) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if force {
                    debug!("Removing existing {}", mountpoint.display());
                    fs::remove_file(mountpoint)
                        .map_err(|source| LockerError::io(record.name(), "attaching", source))?;
                    return self.attach(record, false);
                }
                let existing = real_path(mountpoint);
                if existing == real_path(path) {
                    debug!("{} already attached", record.name());
                    Ok(())
                } else {
                    Err(LockerError::AlreadyAttached {
                        name: record.name().to_string(),
                        existing,
                        mountpoint: mountpoint.to_path_buf(),
                    })
                }
            }
            Err(source) => Err(LockerError::io(record.name(), "attaching", source)),
        }
    }

    /// Remove the locker's mountpoint symlink.
    pub fn detach(&self, record: &LockerRecord) -> Result<(), LockerError> {
        debug!("Attempting to detach {}...", record.name());
        let Some(mountpoint) = record.mountpoint() else {
            return Err(LockerError::not_supported(
                record.name(),
                record.locker_type().tag(),
                "detach",
            ));
        };
        self.check_mountpoint(record, mountpoint)?;
        fs::remove_file(mountpoint)
            .map_err(|source| LockerError::io(record.name(), "detaching", source))
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlink attach requires a unix host",
    ))
}

/// Fully resolved path; dangling links resolve to their target text.
fn real_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| fs::read_link(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::locker::kind::LockerType;
    use crate::ports::OfflineNaming;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        source: PathBuf,
        other: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("mit");
        let source = dir.path().join("srv/tools");
        let other = dir.path().join("srv/other");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(&source).unwrap();
        fs::create_dir_all(&other).unwrap();
        Fixture {
            _dir: dir,
            root,
            source,
            other,
        }
    }

    fn loc(name: &str, path: &Path, mountpoint: &Path) -> LockerRecord {
        LockerRecord::parse(
            name,
            LockerType::Loc,
            &format!("{} n {}", path.display(), mountpoint.display()),
            &OfflineNaming,
        )
        .unwrap()
    }

    #[test]
    fn attach_creates_symlink_and_detach_removes_it() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let mountpoint = fx.root.join("tools");
        let record = loc("tools", &fx.source, &mountpoint);

        registry.attach(&record, false).unwrap();
        assert_eq!(fs::read_link(&mountpoint).unwrap(), fx.source);

        // Already attached to the same place: silent success
        registry.attach(&record, false).unwrap();

        registry.detach(&record).unwrap();
        assert!(fs::symlink_metadata(&mountpoint).is_err());
    }

    #[test]
    fn mountpoint_outside_root_is_rejected() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let outside = fx.root.with_file_name("mitx").join("tools");
        let record = loc("tools", &fx.source, &outside);

        let err = registry.attach(&record, false).unwrap_err();
        assert!(matches!(err, LockerError::InvalidMountpoint { .. }));
        assert!(matches!(
            registry.detach(&record),
            Err(LockerError::InvalidMountpoint { .. })
        ));
        assert!(!outside.exists());
    }

    #[test]
    fn parent_components_cannot_escape_root() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let victim = fx.root.with_file_name("victim");
        fs::write(&victim, "keep").unwrap();

        let escaping = fx.root.join("../escaped");
        let record = loc("escaped", &fx.source, &escaping);
        assert!(matches!(
            registry.attach(&record, true),
            Err(LockerError::InvalidMountpoint { .. })
        ));
        assert!(fs::symlink_metadata(fx.root.with_file_name("escaped")).is_err());

        let record = loc("victim", &fx.source, &fx.root.join("./../victim"));
        assert!(matches!(
            registry.detach(&record),
            Err(LockerError::InvalidMountpoint { .. })
        ));
        assert!(victim.exists());
    }

    #[test]
    fn root_itself_is_not_a_mountpoint() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let record = loc("root", &fx.source, &fx.root);
        assert!(matches!(
            registry.detach(&record),
            Err(LockerError::InvalidMountpoint { .. })
        ));
        assert!(fx.root.is_dir());
    }

    #[test]
    fn foreign_link_needs_force() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let mountpoint = fx.root.join("tools");
        std::os::unix::fs::symlink(&fx.other, &mountpoint).unwrap();
        let record = loc("tools", &fx.source, &mountpoint);

        let err = registry.attach(&record, false).unwrap_err();
        assert!(matches!(err, LockerError::AlreadyAttached { .. }));
        assert_eq!(fs::read_link(&mountpoint).unwrap(), fx.other);

        registry.attach(&record, true).unwrap();
        assert_eq!(fs::read_link(&mountpoint).unwrap(), fx.source);

        registry.attach(&record, true).unwrap();
        assert_eq!(fs::read_link(&mountpoint).unwrap(), fx.source);
    }

    #[test]
    fn detach_missing_link_names_locker() {
        let fx = fixture();
        let registry = LockerRegistry::new(LockerConfig::new(&fx.root), &OfflineNaming);
        let record = loc("gone", &fx.source, &fx.root.join("gone"));

        let err = registry.detach(&record).unwrap_err();
        assert_eq!(err.locker_name(), Some("gone"));
        assert!(err.to_string().ends_with("while detaching"));
    }
}
