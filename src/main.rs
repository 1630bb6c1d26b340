// ABOUTME: Entry point for the edgeship CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use commands::{DeployOptions, PruneOptions, Workspace};
use edgeship::config;
use edgeship::error::Result;
use edgeship::output::{Output, OutputMode};
use std::env;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = output_mode(&cli);

    if let Err(e) = run(cli).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    }
}

async fn run(cli: Cli) -> Result<()> {
    let output = Output::new(output_mode(&cli));
    let cwd = env::current_dir()?;

    if let Commands::Init { app, force } = &cli.command {
        config::init_config(&cwd, app.as_deref(), *force)?;
        output.success(&format!("Created {}", config::CONFIG_FILENAME));
        return Ok(());
    }

    let interactive = !cli.yes && output.is_interactive() && std::io::stdin().is_terminal();
    let workspace = Workspace::open(&cwd, cli.config.as_deref(), cli.env.as_deref(), interactive)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Stack { template } => commands::stack(&workspace, template, output).await,
        Commands::Deploy {
            release_version,
            force,
            no_invalidate,
            prune,
        } => {
            let options = DeployOptions {
                version: release_version,
                force,
                no_invalidate,
                prune,
            };
            commands::deploy(&workspace, options, output).await
        }
        Commands::Prune { keep, current } => {
            commands::prune(&workspace, PruneOptions { keep, current }, output).await
        }
        Commands::Status => commands::status(&workspace, output).await,
    }
}
