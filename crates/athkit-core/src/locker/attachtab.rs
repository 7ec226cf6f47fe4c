//! The persisted table of attached lockers.
//!
//! `<root>/.attachtab` holds one `name:TYPE:data` line per attached
//! locker. The table is read at startup and never written back by core.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::error::{AttachtabError, LockerError};
use super::kind::LockerType;
use super::record::LockerRecord;
use super::registry::LockerConfig;
use crate::ports::NamingService;

/// Attached lockers keyed by mountpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachTable {
    entries: BTreeMap<PathBuf, LockerRecord>,
}

impl AttachTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the attach table for `config`'s namespace root.
    pub fn load(config: &LockerConfig, naming: &dyn NamingService) -> Result<Self, LockerError> {
        let path = config.attachtab_path();
        let contents = fs::read_to_string(&path)
            .map_err(|source| AttachtabError::Read { path, source })?;
        Ok(Self::parse(&contents, &config.namespace_root, naming)?)
    }

    /// Parse attach-table text. Any bad line fails the whole table.
    pub fn parse(
        contents: &str,
        root: &Path,
        naming: &dyn NamingService,
    ) -> Result<Self, AttachtabError> {
        let mut table = Self::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            let text = raw.trim();
            if text.is_empty() {
                continue;
            }

            let mut parts = text.splitn(3, ':');
            let (Some(name), Some(tag), Some(data)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(AttachtabError::Malformed {
                    line,
                    text: text.to_string(),
                });
            };
            let locker_type =
                LockerType::from_tag(tag).ok_or_else(|| AttachtabError::UnknownType {
                    line,
                    kind: tag.to_string(),
                })?;
            let record = LockerRecord::parse(name, locker_type, data, naming).map_err(|e| {
                AttachtabError::Record {
                    line,
                    source: Box::new(e),
                }
            })?;

            let mountpoint = root.join(name);
            if record.mountpoint() != Some(mountpoint.as_path()) {
                warn!("Mountpoint mismatch for locker {name}");
            }
            if !table.insert(mountpoint.clone(), record) {
                return Err(AttachtabError::Duplicate { line, mountpoint });
            }
        }
        Ok(table)
    }

    /// Add an entry. Returns `false` (leaving the table unchanged) if the
    /// mountpoint is already present.
    pub fn insert(&mut self, mountpoint: PathBuf, record: LockerRecord) -> bool {
        if self.entries.contains_key(&mountpoint) {
            return false;
        }
        self.entries.insert(mountpoint, record);
        true
    }

    pub fn by_mountpoint(&self, mountpoint: &Path) -> Option<&LockerRecord> {
        self.entries.get(mountpoint)
    }

    /// First entry (in mountpoint order) whose locker name is `name`.
    pub fn by_name(&self, name: &str) -> Option<&LockerRecord> {
        self.entries.values().find(|r| r.name() == name)
    }

    /// Look up by mountpoint if `key` contains `/`, otherwise by name.
    pub fn lookup(&self, key: &str) -> Result<&LockerRecord, LockerError> {
        let found = if key.contains('/') {
            self.by_mountpoint(Path::new(key))
        } else {
            self.by_name(key)
        };
        found.ok_or_else(|| LockerError::NotAttached(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &LockerRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_path(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The classic `attach -l` listing.
    pub fn legacy_format(&self, user: &str) -> String {
        let mut out = legacy_row("filesystem", "mountpoint", "user", "mode");
        out.push_str(&legacy_row("----------", "----------", "----", "----"));
        for (mountpoint, record) in self.iter() {
            let filesystem = match (record.locker_type(), record.path()) {
                (LockerType::Loc, Some(path)) => path.display().to_string(),
                _ => record.name().to_string(),
            };
            let mode = format!("{},nosuid", record.auth().unwrap_or("n"));
            out.push_str(&legacy_row(
                &ellipsize(&filesystem, 30),
                &mountpoint.display().to_string(),
                user,
                &mode,
            ));
        }
        out
    }
}

fn legacy_row(filesystem: &str, mountpoint: &str, user: &str, mode: &str) -> String {
    format!("{filesystem:<30} {mountpoint:<26} {user:<9} {mode}\n")
}

/// Shorten `text` to `max_len` characters by cutting out the middle.
pub fn ellipsize(text: &str, max_len: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(5);
    let head = keep.div_ceil(2);
    let tail = keep / 2;
    let mut out: String = chars[..head].iter().collect();
    out.push_str("[...]");
    out.extend(&chars[chars.len() - tail..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::OfflineNaming;

    const TABLE: &str = "\
sipb:AFS:/afs/athena.mit.edu/contrib/sipb w /mit/sipb

tools:LOC:/srv/tools n /mit/tools
";

    fn table() -> AttachTable {
        AttachTable::parse(TABLE, Path::new("/mit"), &OfflineNaming).unwrap()
    }

    #[test]
    fn lookup_by_name_and_mountpoint() {
        let table = table();
        assert_eq!(table.len(), 2);

        let sipb = table.lookup("sipb").unwrap();
        assert_eq!(sipb.locker_type(), LockerType::Afs);
        assert_eq!(table.lookup("/mit/sipb").unwrap(), sipb);

        let tools = table.by_name("tools").unwrap();
        assert_eq!(tools.path(), Some(Path::new("/srv/tools")));
        assert_eq!(table.by_mountpoint(Path::new("/mit/tools")), Some(tools));

        assert!(table.contains("tools"));
        assert!(!table.contains("/mit/nothing"));
        assert!(matches!(
            table.lookup("nothing"),
            Err(LockerError::NotAttached(_))
        ));
    }

    #[test]
    fn data_may_contain_colons() {
        let table = AttachTable::parse(
            "web:NFS:/export/www host:8080 n /mit/web\n",
            Path::new("/mit"),
            &OfflineNaming,
        )
        .unwrap();
        assert_eq!(table.lookup("web").unwrap().data(), "/export/www host:8080 n /mit/web");
    }

    #[test]
    fn malformed_line_fails_whole_table() {
        let err = AttachTable::parse("sipb:AFS\n", Path::new("/mit"), &OfflineNaming).unwrap_err();
        assert!(matches!(err, AttachtabError::Malformed { line: 1, .. }));

        let err = AttachTable::parse(
            "tools:LOC:/srv/tools n /mit/tools\nx:UFS:/dev/sd0 w /mit/x\n",
            Path::new("/mit"),
            &OfflineNaming,
        )
        .unwrap_err();
        assert!(matches!(err, AttachtabError::UnknownType { line: 2, .. }));

        let err =
            AttachTable::parse("x:LOC:/srv/x\n", Path::new("/mit"), &OfflineNaming).unwrap_err();
        assert!(matches!(err, AttachtabError::Record { line: 1, .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let text = "tools:LOC:/srv/a n /mit/tools\ntools:LOC:/srv/b n /mit/tools\n";
        let err = AttachTable::parse(text, Path::new("/mit"), &OfflineNaming).unwrap_err();
        assert!(matches!(err, AttachtabError::Duplicate { line: 2, .. }));
    }

    #[test]
    fn legacy_listing() {
        let listing = table().legacy_format("alice");
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("filesystem"));
        assert!(lines[2].starts_with("sipb "));
        assert!(lines[2].ends_with("alice     w,nosuid"));
        assert!(lines[3].starts_with("/srv/tools "));
    }

    #[test]
    fn ellipsize_keeps_both_ends() {
        assert_eq!(ellipsize("short", 30), "short");
        let long = "abcdefghijklmnopqrstuvwxyz0123456789";
        let cut = ellipsize(long, 30);
        assert_eq!(cut.chars().count(), 30);
        assert_eq!(cut, "abcdefghijklm[...]yz0123456789");
    }
}
