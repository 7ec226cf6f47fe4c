//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No process execution in core; probes are injected
//! - Environment and filesystem reads go through small traits so the
//!   resolution rules can be tested without touching the host

pub mod afs;
pub mod env;
pub mod fs;
pub mod machtype;
pub mod naming;

pub use afs::{AfsIntrospector, VolumeStatus};
pub use env::{EnvProvider, SystemEnv};
pub use fs::{FsProbe, SystemFs};
pub use machtype::{MachtypeProbe, MachtypeQuery};
pub use naming::{FilsysEntry, NamingError, NamingService, OfflineNaming};

#[cfg(test)]
pub use afs::MockAfsIntrospector;
#[cfg(test)]
pub use env::MockEnv;
#[cfg(test)]
pub use fs::MockFs;
#[cfg(test)]
pub use machtype::MockMachtypeProbe;
#[cfg(test)]
pub use naming::MockNamingService;
