//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputContext;

/// On-demand cloud dev machines over SSH
#[derive(Parser)]
#[command(
    name = "outpost",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a project and its instance, then connect
    Init {
        /// Project name (also the SSH host alias)
        project: String,
    },

    /// Start an existing project's instance and connect
    Start {
        /// Project name
        project: String,
    },

    /// Terminate a project's instance and remove its record
    Delete {
        /// Project name
        project: String,
    },

    /// Set global configuration (blank input keeps current values)
    Config,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            no_color,
            quiet,
            command,
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        match command {
            Command::Init { project } => commands::init::run(&ctx, &project).await,
            Command::Start { project } => commands::start::run(&ctx, &project).await,
            Command::Delete { project } => commands::delete::run(&ctx, &project).await,
            Command::Config => commands::config::run(&ctx),
        }
    }
}
