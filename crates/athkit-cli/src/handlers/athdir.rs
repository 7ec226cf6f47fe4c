//! Athdir command handler.

use anyhow::Result;
use athkit_core::{PathResolver, ResolveOptions, ResolverConfig};
use tracing::debug;

use super::print_json;
use crate::bootstrap::CliContext;
use crate::commands::AthdirArgs;

/// Resolve every requested base path and print the results.
///
/// Returns whether anything was found.
pub fn execute(ctx: &CliContext, args: &AthdirArgs) -> Result<bool> {
    let found = resolve(ctx, args)?;
    if ctx.config.json {
        print_json(&found)?;
    } else if !found.is_empty() {
        println!("{}", found.join(&args.separator));
    }
    Ok(!found.is_empty())
}

/// The paths `args` select, in base-path order.
pub fn resolve(ctx: &CliContext, args: &AthdirArgs) -> Result<Vec<String>> {
    let options = ResolveOptions {
        editorial_override: args.editorial,
        existence_filter_off: args.no_search,
        force_dependent: args.dependent,
        force_independent: args.independent,
        list_all: args.list_all,
    };
    // Reject bad flag combinations before probing the host
    options.validate()?;

    let bases: Vec<&str> = if args.paths.is_empty() {
        vec!["%p"]
    } else {
        args.paths.iter().map(String::as_str).collect()
    };

    let template = ResolverConfig::default();
    let mut config = ResolverConfig {
        resource_kind: args
            .resource_kind
            .clone()
            .unwrap_or(template.resource_kind),
        custom_template: args.template.clone(),
        system_name: args.system_name.clone(),
        machine_type: args.machine_type.clone(),
        ..template
    };
    let identity = ctx.identity(&config.identity_overrides())?;

    let mut found = Vec::new();
    for base in bases {
        config.base_path = base.to_string();
        let resolver = PathResolver::new(config.clone(), identity.clone(), &ctx.fs);
        debug!("{resolver}");
        found.extend(
            resolver
                .resolve_paths(&options)?
                .into_iter()
                .map(|p| p.display().to_string()),
        );
    }
    Ok(found)
}
