//! `saveguard add <name> <save-path>` — configure an application.

use anyhow::Result;
use std::process::ExitCode;

use crate::app::AppContext;

/// Run `saveguard add`.
///
/// # Errors
///
/// Returns an error for an invalid image name or when the updated
/// configuration document cannot be persisted (the change is discarded).
pub async fn run(app: &AppContext, name: &str, save_path: &str) -> Result<ExitCode> {
    let mut registry = app.load_registry().await?;
    registry
        .add(app.store.as_ref(), app.sink.as_ref(), name, save_path)
        .await?;
    Ok(ExitCode::SUCCESS)
}
