//! Convention flavors.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Which kinds of directory a convention provides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flavors: u8 {
        /// `arch/<sysname>` directories.
        const ARCH = 1 << 0;
        /// Old-style `<sysname>` directories.
        const SYS = 1 << 1;
        /// Old-style `<machtype><type>` directories.
        const MACH = 1 << 2;
        /// Architecture-independent directories.
        const PLAIN = 1 << 3;
    }
}

impl Flavors {
    const TAGS: [(char, Self); 4] = [
        ('A', Self::ARCH),
        ('S', Self::SYS),
        ('M', Self::MACH),
        ('P', Self::PLAIN),
    ];

    /// One-letter tags, e.g. `ASM` for a bin-like policy.
    pub fn tags(self) -> String {
        Self::TAGS
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(tag, _)| *tag)
            .collect()
    }
}

// Serialized as the printable tags so JSON output reads like the CLI.
impl Serialize for Flavors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.tags())
    }
}

impl std::fmt::Display for Flavors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.tags())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_follow_fixed_order() {
        assert_eq!((Flavors::PLAIN | Flavors::ARCH).tags(), "AP");
        assert_eq!((Flavors::MACH | Flavors::SYS | Flavors::ARCH).to_string(), "ASM");
        assert_eq!(Flavors::empty().tags(), "");
    }
}
