//! Path conventions and template expansion.

use serde::Serialize;

use super::flavor::Flavors;

/// Values substituted into a convention template.
#[derive(Debug, Clone, Copy)]
pub struct Expansion<'a> {
    /// `%p`
    pub base_path: &'a str,
    /// `%t`
    pub resource_kind: &'a str,
    /// `%s`
    pub system_name: &'a str,
    /// `%m`
    pub machine_type: &'a str,
}

/// A path template plus the flavors it provides.
///
/// Flavors are derived from the template text once, at construction:
/// anything mentioning `arch` is ARCH, `%m` makes it MACH, a `%s` outside
/// an `arch` tree makes it SYS, and a template with none of these is PLAIN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Convention {
    template: String,
    custom: bool,
    flavors: Flavors,
    uses_system_name: bool,
}

impl Convention {
    /// A built-in convention, subject to flavor and dependency filtering.
    pub fn builtin(template: impl Into<String>) -> Self {
        Self::build(template.into(), false)
    }

    /// A caller-supplied convention; always acceptable, always matching.
    pub fn custom(template: impl Into<String>) -> Self {
        Self::build(template.into(), true)
    }

    fn build(template: String, custom: bool) -> Self {
        let uses_system_name = template.contains("%s");
        let arch = template.contains("arch");

        let mut flavors = Flavors::empty();
        flavors.set(Flavors::ARCH, arch);
        flavors.set(Flavors::MACH, template.contains("%m"));
        flavors.set(Flavors::SYS, uses_system_name && !arch);
        if flavors.is_empty() {
            flavors = Flavors::PLAIN;
        }

        Self {
            template,
            custom,
            flavors,
            uses_system_name,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub const fn is_custom(&self) -> bool {
        self.custom
    }

    pub const fn flavors(&self) -> Flavors {
        self.flavors
    }

    /// Whether expansion depends on the system name (and so is repeated
    /// for every compatibility alias).
    pub const fn uses_system_name(&self) -> bool {
        self.uses_system_name
    }

    /// True if this convention's architecture dependence matches `dependent`.
    pub fn dependency_match(&self, dependent: bool) -> bool {
        self.custom || dependent != self.flavors.contains(Flavors::PLAIN)
    }

    /// True if this convention provides at least one acceptable flavor.
    pub const fn acceptable_for(&self, acceptable: Flavors) -> bool {
        self.custom || self.flavors.intersects(acceptable)
    }

    /// Substitute `%p`, `%t`, `%s` and `%m` in a single pass.
    ///
    /// Substituted text is never rescanned, so a base path containing `%s`
    /// stays literal. Unknown `%` sequences are copied through.
    pub fn expand(&self, vars: &Expansion<'_>) -> String {
        let mut out = String::with_capacity(self.template.len() + 32);
        let mut chars = self.template.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            let value = match chars.peek() {
                Some('s') => Some(vars.system_name),
                Some('m') => Some(vars.machine_type),
                Some('p') => Some(vars.base_path),
                Some('t') => Some(vars.resource_kind),
                _ => None,
            };
            match value {
                Some(v) => {
                    out.push_str(v);
                    chars.next();
                }
                None => out.push('%'),
            }
        }

        out
    }
}

impl std::fmt::Display for Convention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}{}{})",
            self.template,
            self.flavors,
            if self.uses_system_name { "@" } else { "" },
            if self.custom { "C" } else { "" }
        )
    }
}

/// Ordered conventions, most specific first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionSet(Vec<Convention>);

impl ConventionSet {
    /// Built-in templates in specificity order. No new ones get added here.
    pub const BUILTIN_TEMPLATES: [&'static str; 4] =
        ["%p/arch/%s/%t", "%p/%s/%t", "%p/%m%t", "%p/%t"];

    pub fn builtin() -> Self {
        Self(
            Self::BUILTIN_TEMPLATES
                .iter()
                .map(|t| Convention::builtin(*t))
                .collect(),
        )
    }

    /// Built-ins with an optional custom template in front.
    pub fn with_custom(custom_template: Option<&str>) -> Self {
        let mut set = Self::builtin();
        if let Some(template) = custom_template {
            tracing::debug!("Adding custom template: {template}");
            set.0.insert(0, Convention::custom(template));
        }
        set
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Convention> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ConventionSet {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a ConventionSet {
    type Item = &'a Convention;
    type IntoIter = std::slice::Iter<'a, Convention>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: Expansion<'static> = Expansion {
        base_path: "/usr",
        resource_kind: "bin",
        system_name: "sun4",
        machine_type: "sparc",
    };

    #[test]
    fn builtin_flavors_are_derived_from_templates() {
        let set = ConventionSet::builtin();
        let flavors: Vec<Flavors> = set.iter().map(Convention::flavors).collect();
        assert_eq!(
            flavors,
            vec![Flavors::ARCH, Flavors::SYS, Flavors::MACH, Flavors::PLAIN]
        );

        let atsys: Vec<bool> = set.iter().map(Convention::uses_system_name).collect();
        assert_eq!(atsys, vec![true, true, false, false]);
    }

    #[test]
    fn builtins_expand_in_specificity_order() {
        let expanded: Vec<String> = ConventionSet::builtin()
            .iter()
            .map(|c| c.expand(&VARS))
            .collect();
        assert_eq!(
            expanded,
            vec!["/usr/arch/sun4/bin", "/usr/sun4/bin", "/usr/sparcbin", "/usr/bin"]
        );
    }

    #[test]
    fn expansion_does_not_rescan_substituted_text() {
        let vars = Expansion {
            base_path: "/weird/%s",
            resource_kind: "%m",
            ..VARS
        };
        let c = Convention::builtin("%p/arch/%s/%t");
        assert_eq!(c.expand(&vars), "/weird/%s/arch/sun4/%m");
    }

    #[test]
    fn unknown_placeholders_are_literal() {
        let c = Convention::builtin("%p/%x/100%");
        assert_eq!(c.expand(&VARS), "/usr/%x/100%");
    }

    #[test]
    fn custom_convention_always_accepted_and_matching() {
        let c = Convention::custom("%p/share/%t");
        assert!(c.is_custom());
        assert!(c.acceptable_for(Flavors::empty()));
        assert!(c.dependency_match(true));
        assert!(c.dependency_match(false));
    }

    #[test]
    fn plain_convention_is_independent() {
        let plain = Convention::builtin("%p/%t");
        assert!(plain.dependency_match(false));
        assert!(!plain.dependency_match(true));

        let arch = Convention::builtin("%p/arch/%s/%t");
        assert!(arch.dependency_match(true));
        assert!(!arch.dependency_match(false));
    }

    #[test]
    fn custom_goes_first() {
        let set = ConventionSet::with_custom(Some("%p/%t/custom"));
        assert_eq!(set.len(), 5);
        assert!(set.iter().next().unwrap().is_custom());
        assert_eq!(set.iter().next().unwrap().to_string(), "%p/%t/custom (PC)");
    }
}
