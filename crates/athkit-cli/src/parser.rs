//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use std::path::PathBuf;

use athkit_core::DEFAULT_NAMESPACE_ROOT;
use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for locker and architecture-directory tools.
#[derive(Parser)]
#[command(name = "athkit")]
#[command(about = "Resolve lockers and platform-specific directories")]
#[command(version)]
pub struct Cli {
    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Directory lockers are attached under
    #[arg(
        long = "root",
        global = true,
        env = "ATHKIT_LOCKER_ROOT",
        default_value = DEFAULT_NAMESPACE_ROOT
    )]
    pub root: PathBuf,

    /// Filsys database used to resolve locker names
    #[arg(long = "filsys-db", global = true, env = "ATHKIT_FILSYS_DB")]
    pub filsys_db: Option<PathBuf>,

    /// Time limit for external probes (machtype, fs), in milliseconds
    #[arg(
        long = "probe-timeout-ms",
        global = true,
        env = "ATHKIT_PROBE_TIMEOUT_MS",
        default_value_t = 5000
    )]
    pub probe_timeout_ms: u64,

    /// Print results as JSON
    #[arg(long = "json", global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
