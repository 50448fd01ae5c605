//! vaultenv CLI entry point.

use anyhow::Result;
use clap::Parser;

use vaultenv::cli::{Cli, Commands};
use vaultenv::commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let path = cli.path;

    match cli.command {
        Commands::Init => commands::init::run(path, cli.verbose),

        Commands::Set { key, value, service, scope } => {
            commands::set::run(path, key, value, service, scope, cli.verbose).await
        }

        Commands::Get { key, service, scope, reveal } => {
            commands::get::run(path, key, service, scope, reveal, cli.verbose).await
        }

        Commands::Rm { key, service, scope } => {
            commands::rm::run(path, key, service, scope, cli.verbose).await
        }

        Commands::Ls { service, scope, reveal } => {
            commands::ls::run(path, service, scope, reveal, cli.verbose).await
        }

        Commands::Rotate => commands::rotate::run(path, cli.verbose).await,

        Commands::RecoverSetup => commands::recover::setup(path, cli.verbose).await,

        Commands::RecoverRestore { blob } => commands::recover::restore(path, blob, cli.verbose).await,

        Commands::Push => commands::push::run(path, cli.verbose).await,

        Commands::Pull => commands::pull::run(path, cli.verbose).await,

        Commands::Drift => commands::drift::run(path, cli.verbose).await,

        Commands::History => commands::history::run(path, cli.verbose).await,

        Commands::Rollback { version } => {
            commands::rollback::run(path, version, cli.verbose).await
        }

        Commands::Run { command, args, service, scope } => {
            let code = commands::run::run(path, command, args, service, scope, cli.verbose).await?;
            std::process::exit(code);
        }

        Commands::Doctor => commands::doctor::run(path, cli.verbose),
    }
}
