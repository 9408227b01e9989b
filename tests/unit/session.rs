//! Exit handling: backup runs, and the name always goes back on watch.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use saveguard::application::services::pipeline::SavePipeline;
use saveguard::application::services::session;
use saveguard::domain::{AppEntry, Manifest};
use saveguard::infra::archive::ZipArchiver;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::mocks::{BrokenArchiver, CollectingSink, MemoryStore};

const WAIT: Duration = Duration::from_secs(2);

fn manifest_for(save_path: &str) -> Arc<Manifest> {
    Arc::new(Manifest {
        applications: vec![AppEntry {
            name: "game.exe".to_string(),
            save_path: save_path.to_string(),
            ..AppEntry::default()
        }],
        ..Manifest::default()
    })
}

#[tokio::test]
async fn successful_backup_rearms_the_name() {
    let save = TempDir::new().expect("temp dir");
    fs::write(save.path().join("slot.sav"), b"x").unwrap();

    let store = Arc::new(MemoryStore::new());
    let sink: Arc<CollectingSink> = Arc::new(CollectingSink::new());
    let pipeline = Arc::new(SavePipeline::new(
        Arc::clone(&store),
        Arc::new(ZipArchiver),
        sink.clone(),
    ));
    let (rearm_tx, mut rearm_rx) = mpsc::channel(4);

    session::handle_exit(
        pipeline,
        manifest_for(&save.path().to_string_lossy()),
        sink,
        rearm_tx,
        "game.exe".to_string(),
    )
    .await;

    let name = timeout(WAIT, rearm_rx.recv()).await.expect("rearm").unwrap();
    assert_eq!(name, "game.exe");
    assert!(store.object("data/game.zip").is_some(), "archive uploaded");
}

#[tokio::test]
async fn failed_backup_still_rearms_the_name() {
    let store = Arc::new(MemoryStore::new());
    let sink: Arc<CollectingSink> = Arc::new(CollectingSink::new());
    let pipeline = Arc::new(SavePipeline::new(
        Arc::clone(&store),
        Arc::new(BrokenArchiver),
        sink.clone(),
    ));
    let (rearm_tx, mut rearm_rx) = mpsc::channel(4);

    session::handle_exit(
        pipeline,
        manifest_for("/wherever"),
        sink.clone(),
        rearm_tx,
        "game.exe".to_string(),
    )
    .await;

    let name = timeout(WAIT, rearm_rx.recv()).await.expect("rearm").unwrap();
    assert_eq!(name, "game.exe", "monitoring never silently stops");
    assert!(
        sink.messages().iter().any(|m| m.contains("failed")),
        "failure reported"
    );
}

#[tokio::test]
async fn exit_of_an_unconfigured_name_is_logged_and_rearmed() {
    let store = Arc::new(MemoryStore::new());
    let sink: Arc<CollectingSink> = Arc::new(CollectingSink::new());
    let pipeline = Arc::new(SavePipeline::new(
        Arc::clone(&store),
        Arc::new(ZipArchiver),
        sink.clone(),
    ));
    let (rearm_tx, mut rearm_rx) = mpsc::channel(4);

    session::handle_exit(
        pipeline,
        Arc::new(Manifest::default()),
        sink.clone(),
        rearm_tx,
        "ghost.exe".to_string(),
    )
    .await;

    assert_eq!(
        timeout(WAIT, rearm_rx.recv()).await.expect("rearm").unwrap(),
        "ghost.exe"
    );
}
