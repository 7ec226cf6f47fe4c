//! Zephyr command handler.

use anyhow::Result;

use super::print_json;
use crate::bootstrap::CliContext;

/// Print the file-server subscriptions for a locker, one per line.
pub fn execute(ctx: &CliContext, name: &str) -> Result<()> {
    let record = ctx.find_locker(name)?;
    let triplets = record.zephyr_triplets(ctx.afs.as_ref())?;
    if ctx.config.json {
        return print_json(&triplets);
    }
    for triplet in &triplets {
        println!("{triplet}");
    }
    Ok(())
}
