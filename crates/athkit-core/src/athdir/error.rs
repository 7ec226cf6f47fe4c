//! Athdir error types.

use thiserror::Error;

use crate::identity::IdentityError;

/// Errors that can occur while resolving athdir paths.
#[derive(Debug, Error)]
pub enum AthdirError {
    #[error("Dependent and independent overrides are mutually exclusive")]
    MutuallyExclusiveForce,

    #[error("Dependence overrides are meaningless while searching the filesystem")]
    ForceRequiresNoSearch,

    /// Host identity could not be determined.
    #[error(transparent)]
    Identity(#[from] IdentityError),
}

impl AthdirError {
    /// Conflicting or invalid resolver options (as opposed to environment
    /// failures).
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MutuallyExclusiveForce | Self::ForceRequiresNoSearch
        )
    }
}
