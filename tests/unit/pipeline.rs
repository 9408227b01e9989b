//! Backup and restore pipeline behavior over mocked transport.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use saveguard::application::ports::Archiver;
use saveguard::application::services::pipeline::SavePipeline;
use saveguard::domain::{AppEntry, ArchiveError, Manifest, NotConfigured, TransportError};
use saveguard::infra::archive::{ZipArchiver, unpack_sync};
use tempfile::TempDir;
use tokio::sync::{Barrier, Semaphore};
use tokio::time::timeout;

use crate::mocks::{BrokenArchiver, CollectingSink, MemoryStore};

const WAIT: Duration = Duration::from_secs(2);

fn manifest_for(name: &str, save_path: &str) -> Manifest {
    Manifest {
        applications: vec![AppEntry {
            name: name.to_string(),
            save_path: save_path.to_string(),
            ..AppEntry::default()
        }],
        ..Manifest::default()
    }
}

fn pipeline(
    store: Arc<MemoryStore>,
    sink: Arc<CollectingSink>,
) -> SavePipeline<MemoryStore, ZipArchiver> {
    SavePipeline::new(store, Arc::new(ZipArchiver), sink)
}

#[tokio::test]
async fn backup_uploads_an_archive_reproducing_the_save_dir() {
    let save = TempDir::new().expect("temp dir");
    fs::write(save.path().join("a.txt"), b"alpha").unwrap();
    fs::create_dir(save.path().join("sub")).unwrap();
    fs::write(save.path().join("sub/b.txt"), b"beta").unwrap();

    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", &save.path().to_string_lossy());

    pipeline(Arc::clone(&store), sink)
        .backup(&manifest, "game.exe")
        .await
        .expect("backup");

    let bytes = store.object("data/game.zip").expect("archive uploaded");
    let out = TempDir::new().expect("temp dir");
    unpack_sync(&bytes, out.path()).expect("stored bytes are a valid bundle");
    assert_eq!(fs::read(out.path().join("a.txt")).unwrap(), b"alpha");
    assert_eq!(fs::read(out.path().join("sub/b.txt")).unwrap(), b"beta");
}

#[tokio::test]
async fn backup_of_unconfigured_name_is_an_error_without_side_effects() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = Manifest::default();

    let err = pipeline(Arc::clone(&store), sink)
        .backup(&manifest, "unknown.exe")
        .await
        .expect_err("must fail");

    assert!(err.downcast_ref::<NotConfigured>().is_some());
    assert_eq!(store.upload_count(), 0);
    assert_eq!(store.download_count(), 0);
}

#[tokio::test]
async fn backup_with_missing_save_dir_surfaces_archive_error() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", "/definitely/not/here");

    let err = pipeline(Arc::clone(&store), sink)
        .backup(&manifest, "game.exe")
        .await
        .expect_err("must fail");

    assert!(err.downcast_ref::<saveguard::domain::ArchiveError>().is_some());
    assert_eq!(store.upload_count(), 0, "nothing handed to transport");
}

#[tokio::test]
async fn backup_reports_upload_failure_without_erroring() {
    let save = TempDir::new().expect("temp dir");
    fs::write(save.path().join("a.txt"), b"alpha").unwrap();

    let store = Arc::new(MemoryStore::new());
    store.fail_uploads();
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", &save.path().to_string_lossy());

    pipeline(Arc::clone(&store), Arc::clone(&sink))
        .backup(&manifest, "game.exe")
        .await
        .expect("reported, not raised");

    assert!(
        sink.messages().iter().any(|m| m.contains("failed")),
        "failure shows up on the log stream"
    );
}

#[tokio::test]
async fn restore_of_unconfigured_name_performs_no_network_call() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = Manifest::default();

    let err = pipeline(Arc::clone(&store), sink)
        .restore(&manifest, "unknown.exe")
        .await
        .expect_err("must fail");

    assert!(err.downcast_ref::<NotConfigured>().is_some());
    assert_eq!(store.download_count(), 0);
}

#[tokio::test]
async fn restore_without_a_stored_archive_leaves_the_save_dir_untouched() {
    let save = TempDir::new().expect("temp dir");
    fs::write(save.path().join("existing.txt"), b"precious").unwrap();

    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", &save.path().to_string_lossy());

    let err = pipeline(Arc::clone(&store), sink)
        .restore(&manifest, "game.exe")
        .await
        .expect_err("must fail");

    match err.downcast_ref::<TransportError>() {
        Some(TransportError::NotFound(key)) => assert_eq!(key, "data/game.zip"),
        other => panic!("expected NotFound, got {other:?}"),
    }
    let entries: Vec<_> = fs::read_dir(save.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "save dir untouched");
    assert_eq!(fs::read(save.path().join("existing.txt")).unwrap(), b"precious");
}

#[tokio::test]
async fn backup_then_restore_round_trips_through_the_store() {
    let save = TempDir::new().expect("temp dir");
    fs::write(save.path().join("slot1.sav"), b"progress").unwrap();

    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", &save.path().to_string_lossy());
    let pipeline = pipeline(Arc::clone(&store), sink);

    pipeline.backup(&manifest, "game.exe").await.expect("backup");

    // Simulate losing the local copy, then restoring it.
    fs::remove_file(save.path().join("slot1.sav")).unwrap();
    pipeline.restore(&manifest, "game.exe").await.expect("restore");

    assert_eq!(fs::read(save.path().join("slot1.sav")).unwrap(), b"progress");
}

#[tokio::test]
async fn broken_archiver_fails_backup_before_any_upload() {
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = manifest_for("game.exe", "/anything");
    let pipeline: SavePipeline<MemoryStore, BrokenArchiver> =
        SavePipeline::new(Arc::clone(&store), Arc::new(BrokenArchiver), sink);

    assert!(pipeline.backup(&manifest, "game.exe").await.is_err());
    assert_eq!(store.upload_count(), 0);
}

// ── Per-name serialization ────────────────────────────────────────────────────

/// Archiver that parks inside `pack` until released, counting how many packs
/// have entered.
struct GatedArchiver {
    entered: AtomicUsize,
    release: Semaphore,
}

impl GatedArchiver {
    fn new() -> Self {
        Self {
            entered: AtomicUsize::new(0),
            release: Semaphore::new(0),
        }
    }
}

impl Archiver for GatedArchiver {
    async fn pack(&self, _root: &Path) -> Result<Vec<u8>, ArchiveError> {
        self.entered.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .release
            .acquire()
            .await
            .map_err(|e| ArchiveError::Worker(e.to_string()))?;
        permit.forget();
        Ok(Vec::new())
    }

    async fn unpack(&self, _bytes: Vec<u8>, _dest: &Path) -> Result<(), ArchiveError> {
        Ok(())
    }
}

/// Archiver whose `pack` completes only once `participants` packs are inside
/// it at the same time.
struct RendezvousArchiver {
    barrier: Barrier,
}

impl RendezvousArchiver {
    fn new(participants: usize) -> Self {
        Self {
            barrier: Barrier::new(participants),
        }
    }
}

impl Archiver for RendezvousArchiver {
    async fn pack(&self, _root: &Path) -> Result<Vec<u8>, ArchiveError> {
        self.barrier.wait().await;
        Ok(Vec::new())
    }

    async fn unpack(&self, _bytes: Vec<u8>, _dest: &Path) -> Result<(), ArchiveError> {
        Ok(())
    }
}

#[tokio::test]
async fn same_name_backups_queue_rather_than_interleave() {
    let store = Arc::new(MemoryStore::new());
    let archiver = Arc::new(GatedArchiver::new());
    let sink = Arc::new(CollectingSink::new());
    let manifest = Arc::new(manifest_for("game.exe", "/anything"));
    let pipeline = Arc::new(SavePipeline::new(
        Arc::clone(&store),
        Arc::clone(&archiver),
        sink,
    ));

    let p = Arc::clone(&pipeline);
    let m = Arc::clone(&manifest);
    let first = tokio::spawn(async move { p.backup(&m, "game.exe").await });

    // The first backup is inside the archiver, holding the name lock.
    timeout(WAIT, async {
        while archiver.entered.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("first backup reaches the archiver");

    let p = Arc::clone(&pipeline);
    let m = Arc::clone(&manifest);
    let second = tokio::spawn(async move { p.backup(&m, "game.exe").await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        archiver.entered.load(Ordering::SeqCst),
        1,
        "second backup of the same name queues behind the lock"
    );

    archiver.release.add_permits(2);
    first.await.unwrap().expect("first backup");
    second.await.unwrap().expect("second backup");
    assert_eq!(archiver.entered.load(Ordering::SeqCst), 2, "both ran in turn");
    assert_eq!(store.upload_count(), 2);
}

#[tokio::test]
async fn distinct_names_back_up_concurrently() {
    let store = Arc::new(MemoryStore::new());
    let archiver = Arc::new(RendezvousArchiver::new(2));
    let sink = Arc::new(CollectingSink::new());
    let manifest = Arc::new(Manifest {
        applications: vec![
            AppEntry {
                name: "alpha.exe".to_string(),
                save_path: "/a".to_string(),
                ..AppEntry::default()
            },
            AppEntry {
                name: "beta.exe".to_string(),
                save_path: "/b".to_string(),
                ..AppEntry::default()
            },
        ],
        ..Manifest::default()
    });
    let pipeline = Arc::new(SavePipeline::new(Arc::clone(&store), archiver, sink));

    let p = Arc::clone(&pipeline);
    let m = Arc::clone(&manifest);
    let alpha = tokio::spawn(async move { p.backup(&m, "alpha.exe").await });
    let p = Arc::clone(&pipeline);
    let m = Arc::clone(&manifest);
    let beta = tokio::spawn(async move { p.backup(&m, "beta.exe").await });

    // The rendezvous passes only if both packs are inside the archiver at
    // once; serialized backups would never finish.
    timeout(WAIT, alpha)
        .await
        .expect("backups overlap")
        .unwrap()
        .expect("alpha backup");
    timeout(WAIT, beta)
        .await
        .expect("backups overlap")
        .unwrap()
        .expect("beta backup");
    assert_eq!(store.upload_count(), 2);
}
