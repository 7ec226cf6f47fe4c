//! CLI entry point - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together via bootstrap.
//! Command dispatch routes to handlers.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use athkit_cli::{Cli, CliConfig, Commands, bootstrap, exit_code, handlers};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = CliConfig::from_cli(&cli);
    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let ctx = bootstrap(config)?;

    match command {
        Commands::Athdir(args) => {
            if !handlers::athdir::execute(&ctx, &args)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Identity => handlers::identity::execute(&ctx)?,
        Commands::Lookup { name, raw } => handlers::lookup::execute(&ctx, &name, raw)?,
        Commands::Attach { names, force } => handlers::attach::execute(&ctx, &names, force)?,
        Commands::Detach { names } => handlers::attach::detach(&ctx, &names)?,
        Commands::List => handlers::list::execute(&ctx)?,
        Commands::Quota { name } => handlers::quota::execute(&ctx, &name)?,
        Commands::Zephyr { name } => handlers::zephyr::execute(&ctx, &name)?,
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("athkit: {err:#}");
            let code = u8::try_from(exit_code(&err)).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}
