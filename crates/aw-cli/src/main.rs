use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod render;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();

    let all_clean = match &cli.command {
        Commands::Compile {
            sources,
            no_fix,
            no_pin_update,
        } => commands::run_compile(sources, cli.strict, *no_fix, *no_pin_update, cli.format_json)?,
        Commands::Lint { sources } => commands::run_lint(sources, cli.strict, cli.format_json)?,
        Commands::PinUpdate { sources } => commands::run_pin_update(sources, cli.strict, cli.format_json)?,
    };

    if !all_clean {
        std::process::exit(1);
    }
    Ok(())
}
