//! Host identity: system name, compatibility aliases and machine type.
//!
//! Resolution order for each value:
//! 1. Explicit override (CLI flag / caller-supplied)
//! 2. Environment variable (`ATHENA_SYS`, `ATHENA_SYS_COMPAT`, `HOSTTYPE`)
//! 3. The external `machtype` probe
//!
//! The result is captured once in a [`SystemIdentity`] and handed to the
//! path resolver, so nothing downstream reads process-global state.

mod compat;
mod error;
mod probe;

pub use compat::CompatibilityList;
pub use error::IdentityError;
pub use probe::{
    COMPAT_ENV, EnvironmentProbe, HOSTTYPE_ENV, IdentityOverrides, SYSNAME_ENV, SystemIdentity,
};
