//! `saveguard restore <name>` — fetch the stored archive and expand it.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;
use crate::domain::TransportError;
use crate::output::progress;

/// Run `saveguard restore`.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the name is not
/// configured, the download fails, or the bundle cannot be expanded.
pub async fn run(app: &AppContext, name: &str) -> Result<ExitCode> {
    let registry = app.load_registry().await?;
    let pipeline = app.pipeline();

    let spinner = app
        .output
        .show_progress()
        .then(|| progress::spinner(&format!("restoring {name}")));
    let result = pipeline.restore(registry.manifest(), name).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            // "Never backed up" deserves a plain explanation, not a raw error.
            if let Some(TransportError::NotFound(_)) = e.downcast_ref::<TransportError>() {
                app.output
                    .warn(&format!("no backup of '{name}' has been uploaded yet"));
                return Ok(ExitCode::FAILURE);
            }
            Err(e)
        }
    }
}
