//! Quota command handler.

use anyhow::{Context, Result};

use super::print_json;
use crate::bootstrap::CliContext;

pub fn execute(ctx: &CliContext, name: &str) -> Result<()> {
    let record = ctx.find_locker(name)?;
    let quota = record
        .quota(ctx.afs.as_ref())
        .with_context(|| format!("Failed to read quota for {name}"))?;
    if ctx.config.json {
        return print_json(&quota);
    }
    println!("{}: {quota}", record.name());
    Ok(())
}
