//! `saveguard backup <name>` — archive and upload one save directory now.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::output::progress;

/// Run `saveguard backup`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the name is not
/// configured, or the save directory cannot be archived. An upload failure
/// is reported on the log stream but does not fail the command.
pub async fn run(app: &AppContext, name: &str) -> Result<ExitCode> {
    let registry = app.load_registry().await?;
    let pipeline = app.pipeline();

    let spinner = app
        .output
        .show_progress()
        .then(|| progress::spinner(&format!("backing up {name}")));
    let result = pipeline.backup(registry.manifest(), name).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    result?;

    Ok(ExitCode::SUCCESS)
}
