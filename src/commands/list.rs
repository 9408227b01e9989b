//! `saveguard list` — print the configured applications.

use anyhow::Result;
use owo_colors::OwoColorize as _;
use std::process::ExitCode;

use crate::app::AppContext;

/// Run `saveguard list`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let registry = app.load_registry().await?;
    let entries = &registry.manifest().applications;

    if entries.is_empty() {
        app.output.info("no applications configured");
        app.output.info("add one: saveguard add <name> <save-path>");
        return Ok(ExitCode::SUCCESS);
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        // Pad before styling so ANSI codes don't skew the column.
        let padded = format!("{:width$}", entry.name);
        println!("  {}  {}", padded.style(app.output.styles.bold), entry.save_path);
    }

    Ok(ExitCode::SUCCESS)
}
