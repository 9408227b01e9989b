//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Watches applications and mirrors their save data to remote storage
#[derive(Parser)]
#[command(
    name = "saveguard",
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
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Watch configured applications and back up on every exit (runs forever)
    Watch,

    /// Back up one application's save data now
    Backup {
        /// Process image name, e.g. game.exe
        name: String,
    },

    /// Restore one application's save data from the stored archive
    Restore {
        /// Process image name, e.g. game.exe
        name: String,
    },

    /// Configure an application's save directory
    Add {
        /// Process image name, e.g. game.exe
        name: String,
        /// Save directory (may contain %VAR% or ${VAR} placeholders)
        save_path: String,
    },

    /// Remove an application from the configuration
    Remove {
        /// Process image name, e.g. game.exe
        name: String,
    },

    /// List configured applications
    List,

    /// Show an application's save path, raw and expanded
    Path {
        /// Process image name, e.g. game.exe
        name: String,
    },
}

impl Cli {
    /// Dispatch the parsed command.
    ///
    /// # Errors
    ///
    /// Returns any error surfaced by the invoked command.
    pub async fn run(self) -> Result<ExitCode> {
        let app = AppContext::new(&AppFlags {
            quiet: self.quiet,
            no_color: self.no_color,
        })?;

        match self.command {
            Command::Watch => commands::watch::run(&app).await,
            Command::Backup { name } => commands::backup::run(&app, &name).await,
            Command::Restore { name } => commands::restore::run(&app, &name).await,
            Command::Add { name, save_path } => commands::add::run(&app, &name, &save_path).await,
            Command::Remove { name } => commands::remove::run(&app, &name).await,
            Command::List => commands::list::run(&app).await,
            Command::Path { name } => commands::path::run(&app, &name).await,
        }
    }
}
