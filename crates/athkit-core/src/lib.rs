//! Core domain for athkit.
//!
//! Two subsystems live here:
//! - [`athdir`]: picks platform-specific resource directories (binaries,
//!   libraries, man pages) among competing naming conventions
//! - [`locker`]: turns directory-service records into typed lockers and
//!   attaches/detaches them as symlinks under the local namespace root
//!
//! Everything that touches the outside world (naming service, AFS
//! introspection, the `machtype` probe) is reached through the traits in
//! [`ports`]. Concrete adapters live in `athkit-runtime`.
#![deny(unused_crate_dependencies)]

pub mod athdir;
pub mod identity;
pub mod locker;
pub mod ports;

// Re-export commonly used types for convenience
pub use athdir::{
    AthdirError, Convention, ConventionSet, FlavorPolicy, Flavors, PathResolver,
    ResolutionPolicy, ResolveOptions, ResolverConfig,
};
pub use identity::{
    CompatibilityList, EnvironmentProbe, IdentityError, IdentityOverrides, SystemIdentity,
};
pub use locker::{
    AttachTable, DEFAULT_NAMESPACE_ROOT, LockerConfig, LockerError, LockerKind, LockerQuota,
    LockerRecord, LockerRegistry, LockerType, ZephyrTriplet,
};
pub use ports::{
    AfsIntrospector, EnvProvider, FilsysEntry, FsProbe, MachtypeProbe, MachtypeQuery,
    NamingError, NamingService, OfflineNaming, SystemEnv, SystemFs, VolumeStatus,
};

// Silence unused dev-dependency warnings on targets without the unix-only tests
#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
