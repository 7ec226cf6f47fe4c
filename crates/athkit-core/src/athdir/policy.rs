//! Which flavors are acceptable for a given resource kind.

use serde::Serialize;
use tracing::debug;

use super::flavor::Flavors;

/// Flavor rules derived from a resource kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionPolicy {
    pub resource_kind: String,
    /// Whether the resource is architecture-dependent unless forced.
    pub arch_dependent_default: bool,
    pub acceptable: Flavors,
}

/// Classification tables for resource kinds.
///
/// SYS and MACH are kept as separate lists even though they currently
/// hold the same kinds.
#[derive(Debug, Clone)]
pub struct FlavorPolicy {
    independent_kinds: Vec<String>,
    sys_kinds: Vec<String>,
    mach_kinds: Vec<String>,
}

impl FlavorPolicy {
    /// Kinds that are architecture-independent by default.
    pub const INDEPENDENT_KINDS: [&'static str; 2] = ["man", "include"];
    /// Kinds that still accept old-style `<sysname>` directories.
    pub const SYS_KINDS: [&'static str; 3] = ["bin", "lib", "etc"];
    /// Kinds that still accept old-style `<machtype><type>` directories.
    pub const MACH_KINDS: [&'static str; 3] = ["bin", "lib", "etc"];

    pub fn new(
        independent_kinds: Vec<String>,
        sys_kinds: Vec<String>,
        mach_kinds: Vec<String>,
    ) -> Self {
        Self {
            independent_kinds,
            sys_kinds,
            mach_kinds,
        }
    }

    /// Compute the policy for `resource_kind`.
    ///
    /// ARCH is always acceptable. PLAIN is only acceptable when neither
    /// SYS nor MACH is. Unknown kinds are architecture-dependent.
    pub fn policy_for(&self, resource_kind: &str) -> ResolutionPolicy {
        let has = |kinds: &[String]| kinds.iter().any(|k| k == resource_kind);

        let mut acceptable = Flavors::ARCH;
        if has(&self.sys_kinds) {
            debug!("Adding 'SYS' flavor");
            acceptable |= Flavors::SYS;
        }
        if has(&self.mach_kinds) {
            debug!("Adding 'MACH' flavor");
            acceptable |= Flavors::MACH;
        }
        if !acceptable.intersects(Flavors::SYS | Flavors::MACH) {
            debug!("Adding 'PLAIN' flavor");
            acceptable |= Flavors::PLAIN;
        }

        ResolutionPolicy {
            resource_kind: resource_kind.to_string(),
            arch_dependent_default: !has(&self.independent_kinds),
            acceptable,
        }
    }
}

impl Default for FlavorPolicy {
    fn default() -> Self {
        let owned =
            |kinds: &[&str]| -> Vec<String> { kinds.iter().map(|k| (*k).to_string()).collect() };
        Self::new(
            owned(&Self::INDEPENDENT_KINDS),
            owned(&Self::SYS_KINDS),
            owned(&Self::MACH_KINDS),
        )
    }
}
