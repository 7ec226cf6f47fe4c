//! Architecture-aware directory resolution (`athdir`).
//!
//! Given a base path (usually a locker) and a resource kind (`bin`, `lib`,
//! `man`, ...), picks the directory that holds the right flavor of that
//! resource for this host among the competing naming conventions:
//!
//! | template         | flavor |
//! |------------------|--------|
//! | `%p/arch/%s/%t`  | ARCH   |
//! | `%p/%s/%t`       | SYS    |
//! | `%p/%m%t`        | MACH   |
//! | `%p/%t`          | PLAIN  |
//!
//! `%p` is the base path, `%t` the resource kind, `%s` a system name from
//! the compatibility list and `%m` the machine type.

mod convention;
mod error;
mod flavor;
mod policy;
mod resolver;

pub use convention::{Convention, ConventionSet, Expansion};
pub use error::AthdirError;
pub use flavor::Flavors;
pub use policy::{FlavorPolicy, ResolutionPolicy};
pub use resolver::{PathResolver, ResolveOptions, ResolverConfig};
