//! Mapping from domain errors to process exit codes.
//!
//! Exit codes follow Unix conventions:
//! - 1: General error (nothing found, locker unavailable)
//! - 2: Misuse of shell command (invalid arguments)
//! - 64-78: Specific categories (see sysexits.h)

use athkit_core::{AthdirError, IdentityError, LockerError};
use athkit_runtime::FilsysFileError;

const EX_USAGE: i32 = 64;
const EX_DATAERR: i32 = 65;
const EX_NOHOST: i32 = 68;
const EX_UNAVAILABLE: i32 = 69;
const EX_OSERR: i32 = 71;
const EX_IOERR: i32 = 74;
const EX_CONFIG: i32 = 78;

/// Exit code for the first domain error found in `err`'s chain.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<LockerError>() {
            return locker_exit_code(e);
        }
        if let Some(e) = cause.downcast_ref::<AthdirError>() {
            return if e.is_configuration() { 2 } else { EX_OSERR };
        }
        if cause.downcast_ref::<IdentityError>().is_some() {
            return EX_OSERR;
        }
        if cause.downcast_ref::<FilsysFileError>().is_some() {
            return EX_CONFIG;
        }
    }
    1
}

const fn locker_exit_code(err: &LockerError) -> i32 {
    match err {
        LockerError::NotFound { .. } | LockerError::NotAttached(_) => 1,
        LockerError::InvalidName(_) | LockerError::InvalidMountpoint { .. } => EX_USAGE,
        LockerError::InvalidData { .. }
        | LockerError::NestingTooDeep { .. }
        | LockerError::Attachtab(_) => EX_DATAERR,
        LockerError::Resolution { .. } => EX_NOHOST,
        LockerError::Unavailable { .. }
        | LockerError::NotSupported { .. }
        | LockerError::AlreadyAttached { .. } => EX_UNAVAILABLE,
        LockerError::Io { .. } | LockerError::Quota { .. } => EX_IOERR,
    }
}
