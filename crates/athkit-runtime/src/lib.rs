//! OS-level adapters for athkit.
//!
//! Everything here performs active I/O (child processes, files) and
//! implements a port trait from `athkit-core`.
#![deny(unsafe_code)]

pub mod afs;
pub mod filsys;
pub mod machtype;
mod runner;

pub use afs::FsCommandIntrospector;
pub use filsys::{FilsysFile, FilsysFileError};
pub use machtype::CommandMachtype;
pub use runner::{BoundedCommand, DEFAULT_PROBE_TIMEOUT, RunnerError};
