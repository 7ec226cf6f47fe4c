//! Attach and detach command handlers.
//!
//! MUL lockers are expanded into their members; each member is linked or
//! unlinked on its own and recorded in `<root>/.attachtab`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use athkit_core::{LockerError, LockerRecord, LockerRegistry, LockerType};
use tracing::{debug, info};

use crate::bootstrap::CliContext;

/// Attach each named locker using the naming service's preferred record.
pub fn execute(ctx: &CliContext, names: &[String], force: bool) -> Result<()> {
    let registry = ctx.registry();
    for name in names {
        let record = registry
            .lookup(name)?
            .into_iter()
            .next()
            .ok_or_else(|| LockerError::NotFound { name: name.clone() })?;
        for locker in expand(&record) {
            attach_one(ctx, &registry, locker, force)
                .with_context(|| format!("Failed to attach {}", locker.name()))?;
        }
    }
    Ok(())
}

fn attach_one(
    ctx: &CliContext,
    registry: &LockerRegistry<'_>,
    record: &LockerRecord,
    force: bool,
) -> Result<()> {
    registry.attach(record, force)?;
    if let (Some(path), Some(mountpoint)) = (record.path(), record.mountpoint()) {
        update_attachtab(ctx, mountpoint, Some(record))?;
        println!(
            "{}: {} attached to {}",
            record.name(),
            path.display(),
            mountpoint.display()
        );
    }
    if record.auth_required() {
        if let Ok(command) = record.auth_command() {
            info!("{} needs tokens: {}", record.name(), command.join(" "));
        }
    }
    Ok(())
}

/// Detach each locker, looked up by name or mountpoint.
pub fn detach(ctx: &CliContext, keys: &[String]) -> Result<()> {
    let registry = ctx.registry();
    for key in keys {
        let record = ctx.find_locker(key)?;
        for locker in expand(&record) {
            detach_one(ctx, &registry, locker)
                .with_context(|| format!("Failed to detach {}", locker.name()))?;
        }
    }
    Ok(())
}

fn detach_one(
    ctx: &CliContext,
    registry: &LockerRegistry<'_>,
    record: &LockerRecord,
) -> Result<()> {
    if let Some(mountpoint) = record.mountpoint() {
        if !is_link(mountpoint) {
            return Err(LockerError::NotAttached(record.name().to_string()).into());
        }
    }
    registry.detach(record)?;
    if let Some(mountpoint) = record.mountpoint() {
        update_attachtab(ctx, mountpoint, None)?;
    }
    println!("{}: detached", record.name());
    Ok(())
}

/// Point the attach-table entry for `mountpoint` at `record`, or drop it.
///
/// The table is rewritten whole; unchanged tables are left alone.
fn update_attachtab(
    ctx: &CliContext,
    mountpoint: &Path,
    record: Option<&LockerRecord>,
) -> Result<()> {
    let table = ctx.attachtab()?;
    let current = table.by_mountpoint(mountpoint).map(LockerRecord::attachtab_line);
    let wanted = record.map(LockerRecord::attachtab_line);
    if current == wanted {
        return Ok(());
    }

    let mut contents: String = table
        .iter()
        .filter(|(mp, _)| *mp != mountpoint)
        .map(|(_, entry)| format!("{}\n", entry.attachtab_line()))
        .collect();
    if let Some(line) = wanted {
        contents.push_str(&line);
        contents.push('\n');
    }
    let path = ctx.locker_config().attachtab_path();
    debug!("Rewriting {}", path.display());
    fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

fn is_link(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}

/// A MUL locker's members, or the locker itself.
fn expand(record: &LockerRecord) -> Vec<&LockerRecord> {
    if record.locker_type() == LockerType::Mul {
        record.members().iter().flat_map(expand).collect()
    } else {
        vec![record]
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::bootstrap::{CliConfig, bootstrap};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        root: PathBuf,
        srv: PathBuf,
        ctx: CliContext,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("mit");
        let srv = dir.path().join("srv");
        fs::create_dir_all(&root).unwrap();
        fs::create_dir_all(srv.join("a")).unwrap();
        fs::create_dir_all(srv.join("b")).unwrap();
        let db = dir.path().join("filsys.db");
        fs::write(
            &db,
            format!(
                "a:0:LOC:{srv}/a n {root}/a\nb:0:LOC:{srv}/b n {root}/b\nab:0:MUL:a b\n",
                srv = srv.display(),
                root = root.display()
            ),
        )
        .unwrap();
        let ctx = bootstrap(CliConfig {
            namespace_root: root.clone(),
            filsys_db: Some(db),
            probe_timeout: Duration::from_secs(1),
            json: false,
        })
        .unwrap();
        Fixture {
            _dir: dir,
            root,
            srv,
            ctx,
        }
    }

    #[test]
    fn mul_attach_links_every_member() {
        let fx = fixture();
        execute(&fx.ctx, &["ab".to_string()], false).unwrap();
        assert_eq!(fs::read_link(fx.root.join("a")).unwrap(), fx.srv.join("a"));
        assert_eq!(fs::read_link(fx.root.join("b")).unwrap(), fx.srv.join("b"));

        detach(&fx.ctx, &["ab".to_string()]).unwrap();
        assert!(!is_link(&fx.root.join("a")));
        assert!(!is_link(&fx.root.join("b")));
    }

    fn attachtab_names(ctx: &CliContext) -> Vec<String> {
        ctx.attachtab()
            .unwrap()
            .iter()
            .map(|(_, record)| record.name().to_string())
            .collect()
    }

    #[test]
    fn attach_and_detach_maintain_attachtab() {
        let fx = fixture();
        execute(&fx.ctx, &["ab".to_string()], false).unwrap();
        assert_eq!(attachtab_names(&fx.ctx), ["a", "b"]);

        execute(&fx.ctx, &["a".to_string()], false).unwrap();
        assert_eq!(attachtab_names(&fx.ctx), ["a", "b"]);

        detach(&fx.ctx, &["a".to_string()]).unwrap();
        assert_eq!(attachtab_names(&fx.ctx), ["b"]);
        let text = fs::read_to_string(fx.root.join(".attachtab")).unwrap();
        assert_eq!(
            text,
            format!("b:LOC:{} n {}\n", fx.srv.join("b").display(), fx.root.join("b").display())
        );
    }

    #[test]
    fn detach_of_unattached_locker_fails() {
        let fx = fixture();
        let err = detach(&fx.ctx, &["a".to_string()]).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LockerError>(),
            Some(LockerError::NotAttached(name)) if name == "a"
        ));
    }

    #[test]
    fn unknown_locker_fails_attach() {
        let fx = fixture();
        let err = execute(&fx.ctx, &["nope".to_string()], false).unwrap_err();
        assert_eq!(crate::exit_code(&err), 1);
    }
}
