//! Ordered list of system names to search, primary first.

use serde::Serialize;

use super::error::IdentityError;

/// System-name compatibility list.
///
/// Element 0 is always the primary (native) system name; the remaining
/// entries are aliases the host can also run, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompatibilityList(Vec<String>);

impl CompatibilityList {
    /// Build a list from already-ordered names.
    pub fn new(names: Vec<String>) -> Result<Self, IdentityError> {
        if names.is_empty() {
            return Err(IdentityError::EmptyCompatibilityList);
        }
        Ok(Self(names))
    }

    /// Build a list from a primary name followed by its aliases.
    pub fn with_primary(
        primary: impl Into<String>,
        aliases: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut names = vec![primary.into()];
        names.extend(aliases);
        Self(names)
    }

    /// Split a colon-separated alias string (`ATHENA_SYS_COMPAT` / `machtype -C`).
    ///
    /// Empty segments are dropped, so `""` yields no aliases.
    pub fn parse_aliases(raw: &str) -> Vec<String> {
        raw.split(':')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn primary(&self) -> &str {
        &self.0[0]
    }

    pub fn aliases(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for CompatibilityList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(":"))
    }
}
