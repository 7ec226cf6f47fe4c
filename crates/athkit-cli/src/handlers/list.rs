//! List command handler.

use std::path::Path;

use anyhow::Result;
use athkit_core::LockerRecord;
use serde::Serialize;

use super::print_json;
use crate::bootstrap::CliContext;

#[derive(Serialize)]
struct AttachedLocker<'a> {
    mountpoint: &'a Path,
    #[serde(flatten)]
    record: &'a LockerRecord,
}

/// Print the attach table in the classic `attach -l` layout.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let table = ctx.attachtab()?;
    if ctx.config.json {
        let rows: Vec<_> = table
            .iter()
            .map(|(mountpoint, record)| AttachedLocker { mountpoint, record })
            .collect();
        return print_json(&rows);
    }
    print!("{}", table.legacy_format(&current_user()));
    Ok(())
}

#[cfg(unix)]
fn current_user() -> String {
    let uid = nix::unistd::getuid();
    match nix::unistd::User::from_uid(uid) {
        Ok(Some(user)) => user.name,
        _ => uid.to_string(),
    }
}

#[cfg(not(unix))]
fn current_user() -> String {
    std::env::var("USERNAME").unwrap_or_else(|_| "unknown".to_string())
}
