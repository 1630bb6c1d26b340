// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "edgeship")]
#[command(about = "Versioned static-site releases to S3 and CloudFront")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Target environment (defined in config)
    #[arg(short, long, global = true)]
    pub env: Option<String>,

    /// Automatic mode: never prompt, accept defaults
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI (only final result)
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output as JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (default: discover edgeship.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new edgeship.yml configuration file
    Init {
        /// Application name used in bucket and stack names
        #[arg(long)]
        app: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Create or update the environment's infrastructure stack
    Stack {
        /// Template file (default: stack.template from config)
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Upload the build output as a new version and make it live
    Deploy {
        /// Version to release (default: read from the package manifest)
        #[arg(long = "version")]
        release_version: Option<String>,

        /// Redeploy a version that already exists without asking
        #[arg(long)]
        force: bool,

        /// Skip the CDN cache invalidation after cutover
        #[arg(long)]
        no_invalidate: bool,

        /// Prune old versions after a successful release
        #[arg(long)]
        prune: bool,
    },

    /// Delete old versions outside the retention window
    Prune {
        /// Previous versions to keep besides the live one
        #[arg(long)]
        keep: Option<usize>,

        /// Version to treat as live (default: read from the distribution)
        #[arg(long)]
        current: Option<String>,
    },

    /// Show the live version, stored versions, and stack status
    Status,
}
