//! Identity command handler.

use anyhow::Result;
use athkit_core::IdentityOverrides;

use super::print_json;
use crate::bootstrap::CliContext;

/// Print the resolved host identity.
pub fn execute(ctx: &CliContext) -> Result<()> {
    let identity = ctx.identity(&IdentityOverrides::default())?;
    if ctx.config.json {
        return print_json(&identity);
    }
    println!("sysname  = {}", identity.system_name());
    println!("compat   = {}", identity.compatibility);
    println!("hosttype = {}", identity.machine_type);
    Ok(())
}
