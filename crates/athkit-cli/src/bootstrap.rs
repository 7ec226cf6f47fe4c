//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the CLI adapter. All concrete implementations are instantiated here:
//! - Naming service (filsys database via athkit-runtime, or offline)
//! - `machtype` and AFS `fs` probes (via athkit-runtime)
//! - Environment and filesystem providers (via athkit-core)
//!
//! Command handlers receive the composed context and delegate work to the
//! core types it hands out.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use athkit_core::{
    AfsIntrospector, AttachTable, EnvironmentProbe, IdentityOverrides, LockerConfig, LockerError,
    LockerRecord, LockerRegistry, NamingService, OfflineNaming, SystemEnv, SystemFs,
    SystemIdentity,
};
use athkit_runtime::{CommandMachtype, FilsysFile, FsCommandIntrospector};
use tracing::debug;

use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory lockers are attached under.
    pub namespace_root: PathBuf,
    /// Flat-file filsys database, if any.
    pub filsys_db: Option<PathBuf>,
    /// Limit for each external probe invocation.
    pub probe_timeout: Duration,
    /// Emit JSON instead of text.
    pub json: bool,
}

impl CliConfig {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            namespace_root: cli.root.clone(),
            filsys_db: cli.filsys_db.clone(),
            probe_timeout: Duration::from_millis(cli.probe_timeout_ms),
            json: cli.json,
        }
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub naming: Box<dyn NamingService>,
    pub afs: Box<dyn AfsIntrospector>,
    pub machtype: CommandMachtype,
    pub env: SystemEnv,
    pub fs: SystemFs,
}

impl CliContext {
    pub fn locker_config(&self) -> LockerConfig {
        LockerConfig::new(&self.config.namespace_root)
    }

    pub fn registry(&self) -> LockerRegistry<'_> {
        LockerRegistry::new(self.locker_config(), self.naming.as_ref())
    }

    /// Resolve the host identity once, honouring explicit overrides.
    pub fn identity(&self, overrides: &IdentityOverrides) -> Result<SystemIdentity> {
        let identity = EnvironmentProbe::new(&self.env, &self.machtype).identity(overrides)?;
        Ok(identity)
    }

    /// The attach table, or an empty one when none has been written yet.
    pub fn attachtab(&self) -> Result<AttachTable> {
        let path = self.locker_config().attachtab_path();
        if !path.exists() {
            debug!("No attach table at {}", path.display());
            return Ok(AttachTable::new());
        }
        self.registry()
            .attachtab()
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    /// An attached locker by name or mountpoint, else the naming service's
    /// preferred record.
    pub fn find_locker(&self, key: &str) -> Result<LockerRecord> {
        if let Ok(record) = self.attachtab()?.lookup(key) {
            return Ok(record.clone());
        }
        let record = self
            .registry()
            .lookup(key)?
            .into_iter()
            .next()
            .ok_or_else(|| LockerError::NotFound {
                name: key.to_string(),
            })?;
        Ok(record)
    }
}

/// Wire up every adapter for `config`.
pub fn bootstrap(config: CliConfig) -> Result<CliContext> {
    let naming: Box<dyn NamingService> = match &config.filsys_db {
        Some(path) => Box::new(
            FilsysFile::load(path)
                .with_context(|| format!("Failed to open filsys database {}", path.display()))?,
        ),
        None => {
            debug!("No filsys database configured; locker lookups will fail");
            Box::new(OfflineNaming)
        }
    };

    Ok(CliContext {
        afs: Box::new(FsCommandIntrospector::new(config.probe_timeout)),
        machtype: CommandMachtype::new(config.probe_timeout),
        naming,
        env: SystemEnv,
        fs: SystemFs,
        config,
    })
}
