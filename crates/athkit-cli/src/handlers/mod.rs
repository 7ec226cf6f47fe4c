//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call core types handed out by the context
//!   3. Format output for the terminal (text or `--json`)

use anyhow::Result;
use serde::Serialize;

pub mod athdir;
pub mod attach;
pub mod identity;
pub mod list;
pub mod lookup;
pub mod quota;
pub mod zephyr;

/// Pretty-print `value` as JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
