//! Port for the external `machtype` probe.
//!
//! The probe answers the three identity questions the environment may not:
//! the system name (`-S`), the compatibility list (`-C`) and the machine
//! type (no argument). Runtime owns the implementation (`CommandMachtype`).

/// Which identity value to ask the probe for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachtypeQuery {
    SystemName,
    CompatibilityList,
    MachineType,
}

impl MachtypeQuery {
    /// Command-line flag passed to `machtype` for this query.
    pub const fn flag(self) -> Option<&'static str> {
        match self {
            Self::SystemName => Some("-S"),
            Self::CompatibilityList => Some("-C"),
            Self::MachineType => None,
        }
    }
}

impl std::fmt::Display for MachtypeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SystemName => write!(f, "sysname"),
            Self::CompatibilityList => write!(f, "sysname compatibility list"),
            Self::MachineType => write!(f, "host type"),
        }
    }
}

/// Port for querying the host's identity from an external source.
///
/// Implementations swallow (and log) their own failures: `None` means
/// "no usable answer", and the caller decides whether that is fatal.
#[cfg_attr(test, mockall::automock)]
pub trait MachtypeProbe: Send + Sync {
    /// Run the probe and return its trimmed output.
    fn query(&self, query: MachtypeQuery) -> Option<String>;
}
