//! Identity resolution errors.

use thiserror::Error;

use crate::ports::MachtypeQuery;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// Neither the environment nor the probe produced a value.
    #[error("Unable to determine {0}.")]
    Unresolved(MachtypeQuery),

    /// A compatibility list needs at least the primary system name.
    #[error("Compatibility list cannot be empty")]
    EmptyCompatibilityList,
}
