//! Lookup command handler.

use anyhow::Result;

use super::print_json;
use crate::bootstrap::CliContext;

/// Print what the naming service knows about `name`, most preferred first.
pub fn execute(ctx: &CliContext, name: &str, raw: bool) -> Result<()> {
    let registry = ctx.registry();
    if raw {
        let entries = registry.resolve(name)?;
        if ctx.config.json {
            return print_json(&entries);
        }
        for entry in &entries {
            println!("{} {}:{}", entry.priority, entry.kind, entry.data);
        }
        return Ok(());
    }

    let records = registry.lookup(name)?;
    if ctx.config.json {
        return print_json(&records);
    }
    for record in &records {
        println!("{record}");
    }
    Ok(())
}
