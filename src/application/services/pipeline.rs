//! Application service — the backup and restore pipelines.
//!
//! `backup` is directory → bundle → remote object; `restore` is the reverse.
//! Operations on distinct names run concurrently; operations on the same
//! name queue behind a per-name lock so an upload never interleaves with an
//! unpack of the same save directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::application::ports::{Archiver, EventSink, ObjectStore};
use crate::domain::{Manifest, NotConfigured, archive_key, expand_placeholders};

/// Composes the archiver and the object store into the two pipelines.
pub struct SavePipeline<S, A> {
    store: Arc<S>,
    archiver: Arc<A>,
    sink: Arc<dyn EventSink>,
    inflight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: ObjectStore, A: Archiver> SavePipeline<S, A> {
    pub fn new(store: Arc<S>, archiver: Arc<A>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            archiver,
            sink,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Archive the save directory of `name` and upload it.
    ///
    /// An upload failure is reported through the sink but is not an error to
    /// the caller; the archive can be retried manually at any time. A missing
    /// registry entry or an unreadable save directory is an error.
    ///
    /// # Errors
    ///
    /// Returns [`NotConfigured`] if `name` is absent from the registry, or
    /// [`ArchiveError`](crate::domain::ArchiveError) if packing fails.
    pub async fn backup(&self, manifest: &Manifest, name: &str) -> Result<()> {
        let entry = manifest
            .find(name)
            .ok_or_else(|| NotConfigured(name.to_string()))?;
        let _guard = self.name_lock(name);
        let _held = _guard.lock().await;

        let save_path = expand_placeholders(&entry.save_path);
        self.sink.info(&format!("archiving {save_path}"));
        let bytes = self.archiver.pack(Path::new(&save_path)).await?;

        let key = archive_key(name);
        self.sink
            .info(&format!("uploading {key} ({} bytes)", bytes.len()));
        match self.store.upload(&key, bytes).await {
            Ok(()) => self.sink.success(&format!("backed up '{name}'")),
            Err(e) => self.sink.error(&format!("upload of {key} failed: {e}")),
        }
        Ok(())
    }

    /// Download the stored archive of `name` and expand it over the save
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`NotConfigured`] if `name` is absent from the registry,
    /// [`TransportError::NotFound`](crate::domain::TransportError) if no
    /// archive was ever uploaded (the save directory is left untouched), or
    /// [`ArchiveError`](crate::domain::ArchiveError) if expansion fails.
    pub async fn restore(&self, manifest: &Manifest, name: &str) -> Result<()> {
        let entry = manifest
            .find(name)
            .ok_or_else(|| NotConfigured(name.to_string()))?;
        let _guard = self.name_lock(name);
        let _held = _guard.lock().await;

        let key = archive_key(name);
        self.sink.info(&format!("downloading {key}"));
        let bytes = self.store.download(&key).await?;

        let save_path = expand_placeholders(&entry.save_path);
        self.sink
            .info(&format!("restoring {} bytes into {save_path}", bytes.len()));
        self.archiver.unpack(bytes, Path::new(&save_path)).await?;

        self.sink.success(&format!("restored '{name}'"));
        Ok(())
    }

    /// At-most-one in-flight backup or restore per name; later callers for
    /// the same name queue rather than fail.
    fn name_lock(&self, name: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut map = match self.inflight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(name.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
