//! The athdir selection engine.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::convention::{ConventionSet, Expansion};
use super::error::AthdirError;
use super::policy::{FlavorPolicy, ResolutionPolicy};
use crate::identity::{IdentityOverrides, SystemIdentity};
use crate::ports::FsProbe;

/// What to resolve. Immutable for the lifetime of a [`PathResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// `%p`: usually a locker root such as `/mit/gnu`.
    pub base_path: String,
    /// `%t`: `bin`, `lib`, `man`, ...
    pub resource_kind: String,
    /// Tried before the built-in conventions, without filtering.
    pub custom_template: Option<String>,
    /// Overrides the probed system name.
    pub system_name: Option<String>,
    /// Overrides the probed machine type.
    pub machine_type: Option<String>,
}

impl ResolverConfig {
    pub fn new(base_path: impl Into<String>, resource_kind: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            resource_kind: resource_kind.into(),
            custom_template: None,
            system_name: None,
            machine_type: None,
        }
    }

    #[must_use]
    pub fn with_custom_template(mut self, template: impl Into<String>) -> Self {
        self.custom_template = Some(template.into());
        self
    }

    /// Identity overrides carried by this config.
    pub fn identity_overrides(&self) -> IdentityOverrides {
        IdentityOverrides {
            system_name: self.system_name.clone(),
            machine_type: self.machine_type.clone(),
        }
    }
}

impl Default for ResolverConfig {
    /// Unexpanded placeholders, as when no base path or kind is given.
    fn default() -> Self {
        Self::new("%p", "%t")
    }
}

/// Per-call search options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Consider every convention, not only the acceptable flavors.
    pub editorial_override: bool,
    /// Return the first appropriate path without checking it exists.
    pub existence_filter_off: bool,
    /// With `existence_filter_off`: treat the resource as arch-dependent.
    pub force_dependent: bool,
    /// With `existence_filter_off`: treat the resource as arch-independent.
    pub force_independent: bool,
    /// Return every expansion instead of stopping at the first match.
    pub list_all: bool,
}

impl ResolveOptions {
    /// Reject conflicting dependence overrides.
    pub fn validate(&self) -> Result<(), AthdirError> {
        if self.force_dependent && self.force_independent {
            return Err(AthdirError::MutuallyExclusiveForce);
        }
        if self.is_forced() && !self.existence_filter_off {
            return Err(AthdirError::ForceRequiresNoSearch);
        }
        Ok(())
    }

    const fn is_forced(&self) -> bool {
        self.force_dependent || self.force_independent
    }
}

/// Chooses among path conventions for one base path and resource kind.
pub struct PathResolver<'a> {
    config: ResolverConfig,
    policy: ResolutionPolicy,
    conventions: ConventionSet,
    identity: SystemIdentity,
    fs: &'a dyn FsProbe,
}

impl<'a> PathResolver<'a> {
    /// Resolver using the default flavor tables.
    pub fn new(config: ResolverConfig, identity: SystemIdentity, fs: &'a dyn FsProbe) -> Self {
        Self::with_policy(config, identity, &FlavorPolicy::default(), fs)
    }

    pub fn with_policy(
        config: ResolverConfig,
        identity: SystemIdentity,
        flavor_policy: &FlavorPolicy,
        fs: &'a dyn FsProbe,
    ) -> Self {
        let policy = flavor_policy.policy_for(&config.resource_kind);
        let conventions = ConventionSet::with_custom(config.custom_template.as_deref());
        let identity = identity.with_overrides(&config.identity_overrides());
        Self {
            config,
            policy,
            conventions,
            identity,
            fs,
        }
    }

    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub const fn policy(&self) -> &ResolutionPolicy {
        &self.policy
    }

    pub const fn conventions(&self) -> &ConventionSet {
        &self.conventions
    }

    pub const fn identity(&self) -> &SystemIdentity {
        &self.identity
    }

    /// Produce candidate paths.
    ///
    /// Results follow convention order, then compatibility-list order. In
    /// the default search mode at most one (existing) path is returned;
    /// with `existence_filter_off` exactly the first appropriate
    /// expansion is returned without touching the filesystem.
    pub fn resolve_paths(&self, options: &ResolveOptions) -> Result<Vec<PathBuf>, AthdirError> {
        options.validate()?;

        let dependent = if options.force_dependent {
            debug!("Forcing architecture-dependent");
            true
        } else if options.force_independent {
            debug!("Forcing architecture-independent");
            false
        } else {
            self.policy.arch_dependent_default
        };

        let forced_unfiltered = options.is_forced() && options.existence_filter_off;
        let mut found = Vec::new();

        for convention in &self.conventions {
            debug!("** Considering {convention}");
            if !(convention.acceptable_for(self.policy.acceptable)
                || options.editorial_override
                || forced_unfiltered)
            {
                continue;
            }
            if options.existence_filter_off && !convention.dependency_match(dependent) {
                debug!("discarding {convention}");
                continue;
            }

            for system_name in self.identity.compatibility.iter() {
                debug!("Considering sysname {system_name}");
                let path = PathBuf::from(convention.expand(&Expansion {
                    base_path: &self.config.base_path,
                    resource_kind: &self.config.resource_kind,
                    system_name,
                    machine_type: &self.identity.machine_type,
                }));
                debug!("Expanding to {}", path.display());

                if options.list_all || options.existence_filter_off {
                    debug!("Storing {}", path.display());
                    found.push(path);
                    if options.existence_filter_off {
                        return Ok(found);
                    }
                } else if self.fs.exists(&path) {
                    debug!("Path {} exists, returning...", path.display());
                    found.push(path);
                    return Ok(found);
                }

                if !convention.uses_system_name() {
                    debug!("Skipping sysname iteration");
                    break;
                }
            }
        }

        Ok(found)
    }

    /// Whether `path` uses the native system name.
    pub fn is_native(&self, path: &Path) -> bool {
        self.identity.is_native(&path.to_string_lossy())
    }
}

impl std::fmt::Display for PathResolver<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Athdir: path={}, type={}, flags={}, host={}\n        compat={}",
            self.config.base_path,
            self.config.resource_kind,
            self.policy.acceptable,
            self.identity.machine_type,
            self.identity.compatibility
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::CompatibilityList;
    use crate::ports::MockFs;

    fn identity() -> SystemIdentity {
        SystemIdentity::new(
            CompatibilityList::with_primary("sun4", vec!["sun3".to_string()]),
            "sparc".to_string(),
        )
    }

    fn paths(found: &[PathBuf]) -> Vec<&str> {
        found.iter().map(|p| p.to_str().unwrap()).collect()
    }

    #[test]
    fn both_force_flags_always_fail() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);
        for editorial in [false, true] {
            for unfiltered in [false, true] {
                let err = resolver
                    .resolve_paths(&ResolveOptions {
                        editorial_override: editorial,
                        existence_filter_off: unfiltered,
                        force_dependent: true,
                        force_independent: true,
                        list_all: true,
                    })
                    .unwrap_err();
                assert!(matches!(err, AthdirError::MutuallyExclusiveForce));
                assert!(err.is_configuration());
            }
        }
    }

    #[test]
    fn force_without_disabling_search_fails() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);
        for opts in [
            ResolveOptions {
                force_dependent: true,
                ..Default::default()
            },
            ResolveOptions {
                force_independent: true,
                list_all: true,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                resolver.resolve_paths(&opts),
                Err(AthdirError::ForceRequiresNoSearch)
            ));
        }
    }

    #[test]
    fn first_existing_path_wins() {
        let fs = MockFs::new()
            .with_existing("/usr/sun3/bin")
            .with_existing("/usr/bin");
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);

        let found = resolver.resolve_paths(&ResolveOptions::default()).unwrap();
        assert_eq!(paths(&found), ["/usr/sun3/bin"]);
    }

    #[test]
    fn plain_dir_ignored_for_bin_without_editorial_override() {
        let fs = MockFs::new().with_existing("/usr/bin");
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);

        assert!(resolver.resolve_paths(&ResolveOptions::default()).unwrap().is_empty());

        let found = resolver
            .resolve_paths(&ResolveOptions {
                editorial_override: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paths(&found), ["/usr/bin"]);
    }

    #[test]
    fn list_all_expands_every_acceptable_convention() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);

        let found = resolver
            .resolve_paths(&ResolveOptions {
                list_all: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            paths(&found),
            [
                "/usr/arch/sun4/bin",
                "/usr/arch/sun3/bin",
                "/usr/sun4/bin",
                "/usr/sun3/bin",
                "/usr/sparcbin",
            ]
        );
    }

    #[test]
    fn unfiltered_returns_first_dependency_match_only() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "man"), identity(), &fs);

        let found = resolver
            .resolve_paths(&ResolveOptions {
                existence_filter_off: true,
                list_all: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paths(&found), ["/usr/man"]);

        let found = resolver
            .resolve_paths(&ResolveOptions {
                existence_filter_off: true,
                force_dependent: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paths(&found), ["/usr/arch/sun4/man"]);
    }

    #[test]
    fn forced_independent_bin_reaches_plain_convention() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);

        let found = resolver
            .resolve_paths(&ResolveOptions {
                existence_filter_off: true,
                force_independent: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paths(&found), ["/usr/bin"]);
    }

    #[test]
    fn configured_identity_wins_over_probed() {
        let fs = MockFs::new();
        let config = ResolverConfig {
            system_name: Some("amd64_deb50".to_string()),
            machine_type: Some("linux".to_string()),
            ..ResolverConfig::new("/usr", "bin")
        };
        let resolver = PathResolver::new(config, identity(), &fs);
        assert_eq!(resolver.identity().system_name(), "amd64_deb50");
        assert_eq!(resolver.identity().machine_type, "linux");
        assert_eq!(resolver.identity().compatibility.aliases(), ["sun3"]);

        let found = resolver
            .resolve_paths(&ResolveOptions {
                existence_filter_off: true,
                force_dependent: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paths(&found), ["/usr/arch/amd64_deb50/bin"]);
    }

    #[test]
    fn machine_type_override_keeps_system_name() {
        let fs = MockFs::new();
        let config = ResolverConfig {
            machine_type: Some("i386".to_string()),
            ..ResolverConfig::new("/usr", "bin")
        };
        let resolver = PathResolver::new(config, identity(), &fs);
        assert_eq!(resolver.identity().system_name(), "sun4");
        assert_eq!(resolver.identity().machine_type, "i386");
    }

    #[test]
    fn forcing_does_not_change_later_calls() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "man"), identity(), &fs);
        let unfiltered = ResolveOptions {
            existence_filter_off: true,
            ..Default::default()
        };

        resolver
            .resolve_paths(&ResolveOptions {
                force_dependent: true,
                ..unfiltered
            })
            .unwrap();
        let found = resolver.resolve_paths(&unfiltered).unwrap();
        assert_eq!(paths(&found), ["/usr/man"]);
    }

    #[test]
    fn custom_template_is_tried_first() {
        let fs = MockFs::new()
            .with_existing("/usr/share/bin")
            .with_existing("/usr/arch/sun4/bin");
        let config = ResolverConfig::new("/usr", "bin").with_custom_template("%p/share/%t");
        let resolver = PathResolver::new(config, identity(), &fs);

        let found = resolver.resolve_paths(&ResolveOptions::default()).unwrap();
        assert_eq!(paths(&found), ["/usr/share/bin"]);
    }

    #[test]
    fn display_summarises_resolver() {
        let fs = MockFs::new();
        let resolver = PathResolver::new(ResolverConfig::new("/usr", "bin"), identity(), &fs);
        let text = resolver.to_string();
        assert!(text.starts_with("Athdir: path=/usr, type=bin, flags=ASM, host=sparc"));
        assert!(text.ends_with("compat=sun4:sun3"));
        assert!(resolver.is_native(Path::new("/usr/arch/sun4/bin")));
    }
}
