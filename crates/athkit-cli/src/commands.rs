//! Main commands enum and primary subcommands.

use clap::{Args, Subcommand};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Find the platform-specific directory for a resource type
    Athdir(AthdirArgs),

    /// Show the system name, compatibility list and machine type
    Identity,

    /// Resolve a locker through the naming service
    Lookup {
        /// Locker name
        name: String,
        /// Show raw filsys entries instead of parsed records
        #[arg(long)]
        raw: bool,
    },

    /// Attach lockers under the namespace root
    Attach {
        /// Locker names
        #[arg(required = true)]
        names: Vec<String>,
        /// Replace whatever is at the mountpoint
        #[arg(short, long)]
        force: bool,
    },

    /// Remove attached lockers
    Detach {
        /// Locker names or mountpoints
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// List the attach table
    List,

    /// Show the quota of an AFS locker
    Quota {
        /// Locker name or mountpoint
        name: String,
    },

    /// Show Zephyr subscriptions for a locker's file servers
    Zephyr {
        /// Locker name or mountpoint
        name: String,
    },
}

/// Arguments for `athkit athdir`.
#[derive(Args, Debug, Clone, Default)]
pub struct AthdirArgs {
    /// Base paths to search; `%p` is kept literally when omitted
    pub paths: Vec<String>,

    /// Resource type (bin, lib, man, ...)
    #[arg(short = 't', long = "type")]
    pub resource_kind: Option<String>,

    /// Custom convention template tried before the built-in ones
    #[arg(short = 'f', long = "format")]
    pub template: Option<String>,

    /// Consider every convention regardless of flavor rules
    #[arg(short = 'e', long = "editorial")]
    pub editorial: bool,

    /// Do not check the filesystem; print the first appropriate path
    #[arg(short = 'c', long = "no-search")]
    pub no_search: bool,

    /// Treat the resource as architecture-dependent (requires -c)
    #[arg(short = 'd', long = "dependent")]
    pub dependent: bool,

    /// Treat the resource as architecture-independent (requires -c)
    #[arg(short = 'i', long = "independent")]
    pub independent: bool,

    /// List every candidate instead of stopping at the first match
    #[arg(short = 'l', long = "list")]
    pub list_all: bool,

    /// Override the system name
    #[arg(short = 's', long = "sysname")]
    pub system_name: Option<String>,

    /// Override the machine type
    #[arg(short = 'm', long = "machtype")]
    pub machine_type: Option<String>,

    /// Separator between printed paths
    #[arg(short = 'r', long = "separator", default_value = ":")]
    pub separator: String,
}
