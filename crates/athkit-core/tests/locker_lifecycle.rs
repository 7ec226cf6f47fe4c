//! Resolve, attach, record and detach lockers against a scratch namespace root.
#![cfg(unix)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use athkit_core::{
    FilsysEntry, LockerConfig, LockerError, LockerRegistry, LockerType, NamingError,
    NamingService,
};
use tempfile::TempDir;

/// In-memory filsys database.
#[derive(Default)]
struct StaticNaming(HashMap<String, Vec<FilsysEntry>>);

impl StaticNaming {
    fn with(mut self, name: &str, priority: u32, kind: &str, data: String) -> Self {
        self.0
            .entry(name.to_string())
            .or_default()
            .push(FilsysEntry::new(priority, kind, data));
        self
    }
}

impl NamingService for StaticNaming {
    fn resolve_filsys(&self, name: &str) -> Result<Vec<FilsysEntry>, NamingError> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| NamingError::NotFound(name.to_string()))
    }
}

struct Scratch {
    _dir: TempDir,
    root: PathBuf,
    srv: PathBuf,
}

fn scratch() -> Scratch {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("mit");
    let srv = dir.path().join("srv");
    fs::create_dir_all(&root).unwrap();
    fs::create_dir_all(srv.join("tools")).unwrap();
    fs::create_dir_all(srv.join("tools-backup")).unwrap();
    Scratch {
        _dir: dir,
        root,
        srv,
    }
}

fn loc_data(path: &Path, mountpoint: &Path) -> String {
    format!("{} n {}", path.display(), mountpoint.display())
}

#[test]
fn preferred_record_is_attached_and_recorded() {
    let s = scratch();
    let mountpoint = s.root.join("tools");
    let naming = StaticNaming::default()
        .with("tools", 2, "LOC", loc_data(&s.srv.join("tools-backup"), &mountpoint))
        .with("tools", 1, "LOC", loc_data(&s.srv.join("tools"), &mountpoint));
    let registry = LockerRegistry::new(LockerConfig::new(&s.root), &naming);

    let records = registry.lookup("tools").unwrap();
    assert_eq!(records.len(), 2);
    let preferred = &records[0];
    assert_eq!(preferred.path(), Some(s.srv.join("tools").as_path()));

    registry.attach(preferred, false).unwrap();
    assert_eq!(fs::read_link(&mountpoint).unwrap(), s.srv.join("tools"));

    fs::write(
        LockerConfig::new(&s.root).attachtab_path(),
        format!("{}\n", preferred.attachtab_line()),
    )
    .unwrap();
    let table = registry.attachtab().unwrap();
    assert_eq!(table.len(), 1);
    let listed = table.lookup(&mountpoint.to_string_lossy()).unwrap();
    assert_eq!(listed.locker_type(), LockerType::Loc);
    assert_eq!(table.lookup("tools").unwrap().name(), "tools");

    registry.detach(preferred).unwrap();
    assert!(fs::symlink_metadata(&mountpoint).is_err());
}

#[test]
fn conflicting_attach_needs_force() {
    let s = scratch();
    let mountpoint = s.root.join("tools");
    let naming = StaticNaming::default()
        .with("tools", 1, "LOC", loc_data(&s.srv.join("tools"), &mountpoint))
        .with("backup", 1, "LOC", loc_data(&s.srv.join("tools-backup"), &mountpoint));
    let registry = LockerRegistry::new(LockerConfig::new(&s.root), &naming);

    let tools = registry.lookup("tools").unwrap().remove(0);
    let backup = registry.lookup("backup").unwrap().remove(0);

    registry.attach(&tools, false).unwrap();
    // Same target again is a no-op
    registry.attach(&tools, false).unwrap();

    let err = registry.attach(&backup, false).unwrap_err();
    assert!(matches!(err, LockerError::AlreadyAttached { .. }), "{err}");

    registry.attach(&backup, true).unwrap();
    assert_eq!(
        fs::read_link(&mountpoint).unwrap(),
        s.srv.join("tools-backup")
    );
}

#[test]
fn mountpoint_outside_root_is_rejected() {
    let s = scratch();
    let naming = StaticNaming::default().with(
        "escape",
        1,
        "LOC",
        loc_data(&s.srv.join("tools"), &s.srv.join("escape")),
    );
    let registry = LockerRegistry::new(LockerConfig::new(&s.root), &naming);
    let record = registry.lookup("escape").unwrap().remove(0);

    let err = registry.attach(&record, false).unwrap_err();
    assert!(matches!(err, LockerError::InvalidMountpoint { .. }), "{err}");
    assert!(!s.srv.join("escape").exists());
}

#[test]
fn mul_locker_cannot_be_attached_directly() {
    let s = scratch();
    let naming = StaticNaming::default()
        .with("tools", 1, "LOC", loc_data(&s.srv.join("tools"), &s.root.join("tools")))
        .with("bundle", 1, "MUL", "tools".to_string());
    let registry = LockerRegistry::new(LockerConfig::new(&s.root), &naming);

    let bundle = registry.lookup("bundle").unwrap().remove(0);
    assert_eq!(bundle.members().len(), 1);
    for member in bundle.members() {
        registry.attach(member, false).unwrap();
    }
    let err = registry.attach(&bundle, false).unwrap_err();
    assert!(matches!(err, LockerError::NotSupported { .. }), "{err}");
}

#[test]
fn unknown_locker_is_not_found() {
    let naming = StaticNaming::default();
    let registry = LockerRegistry::new(LockerConfig::default(), &naming);
    assert!(matches!(
        registry.lookup("nope"),
        Err(LockerError::NotFound { .. })
    ));
}
