//! Lockers: named, independently attachable network filesystems.
//!
//! A locker name resolves (through a [`NamingService`](crate::ports::NamingService))
//! to one or more filsys entries. Each entry parses into a [`LockerRecord`]
//! whose [`LockerKind`] carries the type-specific fields. Attaching a
//! locker links its mountpoint under the namespace root to its path;
//! currently attached lockers are listed in the [`AttachTable`].

mod attachtab;
mod error;
mod kind;
mod lookup;
mod quota;
mod record;
mod registry;

pub use attachtab::{AttachTable, ellipsize};
pub use error::{AttachtabError, LockerError};
pub use kind::{Capability, LockerKind, LockerType};
pub use lookup::{lookup, resolve};
pub use quota::{LockerQuota, QuotaUnits};
pub use record::{LockerRecord, MAX_MUL_DEPTH, ZephyrTriplet};
pub use registry::{ATTACHTAB_FILE, DEFAULT_NAMESPACE_ROOT, LockerConfig, LockerRegistry};
