//! Environment-first identity probing with `machtype` fallback.

use serde::Serialize;
use tracing::info;

use super::compat::CompatibilityList;
use super::error::IdentityError;
use crate::ports::{EnvProvider, MachtypeProbe, MachtypeQuery};

/// Overrides the system name.
pub const SYSNAME_ENV: &str = "ATHENA_SYS";
/// Colon-separated compatibility aliases.
pub const COMPAT_ENV: &str = "ATHENA_SYS_COMPAT";
/// Overrides the machine (host) type.
pub const HOSTTYPE_ENV: &str = "HOSTTYPE";

/// Explicit values that win over both the environment and the probe.
#[derive(Debug, Clone, Default)]
pub struct IdentityOverrides {
    pub system_name: Option<String>,
    pub machine_type: Option<String>,
}

/// Resolved host identity, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemIdentity {
    pub compatibility: CompatibilityList,
    pub machine_type: String,
}

impl SystemIdentity {
    pub const fn new(compatibility: CompatibilityList, machine_type: String) -> Self {
        Self {
            compatibility,
            machine_type,
        }
    }

    pub fn system_name(&self) -> &str {
        self.compatibility.primary()
    }

    /// Replace the primary name and machine type where `overrides` sets
    /// them. Aliases are kept.
    #[must_use]
    pub fn with_overrides(self, overrides: &IdentityOverrides) -> Self {
        let compatibility = match &overrides.system_name {
            Some(name) => {
                CompatibilityList::with_primary(name.clone(), self.compatibility.aliases().to_vec())
            }
            None => self.compatibility,
        };
        let machine_type = overrides.machine_type.clone().unwrap_or(self.machine_type);
        Self::new(compatibility, machine_type)
    }

    /// Whether `path` refers to the native system name rather than a
    /// compatibility alias.
    pub fn is_native(&self, path: &str) -> bool {
        path.contains(self.system_name())
    }
}

/// Reads identity values from the environment, falling back to `machtype`.
pub struct EnvironmentProbe<'a> {
    env: &'a dyn EnvProvider,
    machtype: &'a dyn MachtypeProbe,
}

impl<'a> EnvironmentProbe<'a> {
    pub fn new(env: &'a dyn EnvProvider, machtype: &'a dyn MachtypeProbe) -> Self {
        Self { env, machtype }
    }

    fn lookup(&self, var: &str, query: MachtypeQuery) -> Result<String, IdentityError> {
        if let Some(value) = self.env.get_string(var) {
            return Ok(value);
        }
        info!("{var} is unset");
        self.machtype
            .query(query)
            .ok_or(IdentityError::Unresolved(query))
    }

    /// The primary system name (`ATHENA_SYS`, else `machtype -S`).
    pub fn system_name(&self) -> Result<String, IdentityError> {
        self.lookup(SYSNAME_ENV, MachtypeQuery::SystemName)
    }

    /// Compatibility aliases only (`ATHENA_SYS_COMPAT`, else `machtype -C`).
    pub fn compatibility_aliases(&self) -> Result<Vec<String>, IdentityError> {
        let raw = self.lookup(COMPAT_ENV, MachtypeQuery::CompatibilityList)?;
        Ok(CompatibilityList::parse_aliases(&raw))
    }

    /// Full compatibility list with the probed system name first.
    pub fn compatibility_list(&self) -> Result<CompatibilityList, IdentityError> {
        let primary = self.system_name()?;
        Ok(CompatibilityList::with_primary(
            primary,
            self.compatibility_aliases()?,
        ))
    }

    /// The machine type (`HOSTTYPE`, else bare `machtype`).
    pub fn machine_type(&self) -> Result<String, IdentityError> {
        self.lookup(HOSTTYPE_ENV, MachtypeQuery::MachineType)
    }

    /// Resolve everything once, honouring explicit overrides.
    ///
    /// The alias list is always probed, even when the system name is
    /// overridden.
    pub fn identity(&self, overrides: &IdentityOverrides) -> Result<SystemIdentity, IdentityError> {
        let primary = match &overrides.system_name {
            Some(name) => name.clone(),
            None => self.system_name()?,
        };
        let compatibility =
            CompatibilityList::with_primary(primary, self.compatibility_aliases()?);
        let machine_type = match &overrides.machine_type {
            Some(machine) => machine.clone(),
            None => self.machine_type()?,
        };
        Ok(SystemIdentity::new(compatibility, machine_type))
    }
}
