//! `saveguard watch` — run the watch → detect → archive → transfer loop.

use anyhow::Result;
use std::process::ExitCode;
use std::sync::Arc;

use crate::app::AppContext;
use crate::application::services::session;
use crate::application::services::watcher::ProcessWatcher;
use crate::infra::processes::SystemProbe;

/// Run `saveguard watch`. Blocks for the process lifetime of the tool;
/// cancellation is Ctrl-C.
///
/// # Errors
///
/// Returns an error only if the configuration document cannot be loaded at
/// startup.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let watcher = ProcessWatcher::new(SystemProbe::new(), Arc::clone(&app.sink));
    session::run(
        Arc::clone(&app.store),
        Arc::clone(&app.archiver),
        watcher,
        Arc::clone(&app.sink),
    )
    .await?;
    Ok(ExitCode::SUCCESS)
}
