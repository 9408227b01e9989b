//! Application service — the application→save-path configuration registry.
//!
//! The remote copy of the configuration document is the single source of
//! truth. Every mutation re-uploads the whole document and only touches the
//! in-memory manifest once that upload has succeeded; a failed upload rolls
//! the mutation back and surfaces [`PersistError`].

use anyhow::{Context, Result};

use crate::application::ports::{EventSink, ObjectStore};
use crate::domain::{
    AppEntry, CONFIG_KEY, ConfigError, Manifest, PersistError, validate_image_name,
};

/// In-memory registry mirroring the remote configuration document.
#[derive(Debug)]
pub struct SaveRegistry {
    manifest: Manifest,
}

impl SaveRegistry {
    /// Download and parse the configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the document cannot be fetched or parsed.
    /// Callers treat this as fatal: no pipeline can run without a config.
    pub async fn load(store: &impl ObjectStore) -> Result<Self, ConfigError> {
        let bytes = store.download(CONFIG_KEY).await.map_err(ConfigError::Fetch)?;
        let mut manifest: Manifest =
            serde_json::from_slice(&bytes).map_err(ConfigError::Malformed)?;
        manifest.sort();
        Ok(Self { manifest })
    }

    /// Registry with the given manifest, used by embedders and tests.
    #[must_use]
    pub fn from_manifest(mut manifest: Manifest) -> Self {
        manifest.sort();
        Self { manifest }
    }

    #[must_use]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[must_use]
    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Entry with the given image name, if configured.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&AppEntry> {
        self.manifest.find(name)
    }

    /// Configure `name` → `save_path`, replacing any entry that collides on
    /// either the name or the path ("modify" semantics, never a duplicate).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidName`] for a malformed image name, or
    /// [`PersistError`] if the re-upload fails — in which case the in-memory
    /// registry is unchanged.
    pub async fn add(
        &mut self,
        store: &impl ObjectStore,
        sink: &dyn EventSink,
        name: &str,
        save_path: &str,
    ) -> Result<()> {
        validate_image_name(name)?;

        let mut next = self.manifest.clone();
        if let Some(pos) = next
            .applications
            .iter()
            .position(|e| e.name == name || e.save_path == save_path)
        {
            let old = next.applications.remove(pos);
            sink.warn(&format!(
                "'{}' ({}) is already configured, replacing it",
                old.name, old.save_path
            ));
        }
        next.applications.push(AppEntry {
            name: name.to_string(),
            save_path: save_path.to_string(),
            ..AppEntry::default()
        });
        next.sort();

        persist(store, &next).await?;
        self.manifest = next;
        sink.success(&format!("configured '{name}' -> {save_path}"));
        Ok(())
    }

    /// Remove `name` from the registry. Removing an absent name is a
    /// successful no-op and performs no network call.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError`] if the re-upload fails — in which case the
    /// in-memory registry is unchanged.
    pub async fn remove(
        &mut self,
        store: &impl ObjectStore,
        sink: &dyn EventSink,
        name: &str,
    ) -> Result<()> {
        let Some(pos) = self.manifest.applications.iter().position(|e| e.name == name) else {
            sink.info(&format!("'{name}' is not configured, nothing to remove"));
            return Ok(());
        };

        let mut next = self.manifest.clone();
        next.applications.remove(pos);

        persist(store, &next).await?;
        self.manifest = next;
        sink.success(&format!("removed '{name}'"));
        Ok(())
    }
}

/// Upload the whole document under the well-known key.
///
/// Pretty-printed so the remote copy stays hand-inspectable.
async fn persist(store: &impl ObjectStore, manifest: &Manifest) -> Result<()> {
    let bytes =
        serde_json::to_vec_pretty(manifest).context("cannot serialize configuration document")?;
    store
        .upload(CONFIG_KEY, bytes)
        .await
        .map_err(PersistError)?;
    Ok(())
}
