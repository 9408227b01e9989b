//! Application service — the long-running watch session.
//!
//! Composition: load the registry → start the watcher with every configured
//! name → for each detected exit, run the backup pipeline as its own task →
//! re-arm the name unconditionally. A failed backup is logged and the
//! application goes back on watch; the loop itself never dies on a pipeline
//! error.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;

use crate::application::ports::{Archiver, EventSink, ObjectStore, ProcessProbe};
use crate::application::services::pipeline::SavePipeline;
use crate::application::services::registry::SaveRegistry;
use crate::application::services::watcher::{ProcessWatcher, WatchSet};
use crate::domain::Manifest;

/// Channel depth for exit and re-arm messages. Exits are rare (a human
/// closing an application); a small buffer is plenty.
const CHANNEL_DEPTH: usize = 16;

/// Run the watch session forever.
///
/// # Errors
///
/// Returns an error only if the configuration document cannot be loaded at
/// startup; after that the session runs for the process lifetime.
pub async fn run<S, A, P>(
    store: Arc<S>,
    archiver: Arc<A>,
    watcher: ProcessWatcher<P>,
    sink: Arc<dyn EventSink>,
) -> Result<()>
where
    S: ObjectStore + 'static,
    A: Archiver + 'static,
    P: ProcessProbe + 'static,
{
    let registry = SaveRegistry::load(store.as_ref()).await?;
    let manifest = Arc::new(registry.into_manifest());
    let names = manifest.names();
    sink.info(&format!("watching processes: {}", names.join(", ")));

    let (exit_tx, mut exit_rx) = mpsc::channel(CHANNEL_DEPTH);
    let (rearm_tx, rearm_rx) = mpsc::channel(CHANNEL_DEPTH);
    tokio::spawn(watcher.run(WatchSet::new(names), rearm_rx, exit_tx));

    let pipeline = Arc::new(SavePipeline::new(store, archiver, Arc::clone(&sink)));
    while let Some(name) = exit_rx.recv().await {
        sink.info(&format!("{name} terminated"));
        tokio::spawn(handle_exit(
            Arc::clone(&pipeline),
            Arc::clone(&manifest),
            Arc::clone(&sink),
            rearm_tx.clone(),
            name,
        ));
    }
    Ok(())
}

/// Back up one terminated application, then put it back on watch regardless
/// of the outcome — a failed backup must never silently stop monitoring.
pub async fn handle_exit<S: ObjectStore, A: Archiver>(
    pipeline: Arc<SavePipeline<S, A>>,
    manifest: Arc<Manifest>,
    sink: Arc<dyn EventSink>,
    rearm: mpsc::Sender<String>,
    name: String,
) {
    if let Err(e) = pipeline.backup(&manifest, &name).await {
        sink.error(&format!("backup of {name} failed: {e:#}"));
    }
    let _ = rearm.send(name).await;
}
