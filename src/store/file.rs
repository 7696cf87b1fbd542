//! JSON file-backed draft store.
//!
//! Writes go to a temporary sibling file that is renamed over the catalog,
//! so readers never see a half-written catalog. `save_one` re-reads the
//! catalog, upserts and writes it back under an exclusive lock on
//! `<catalog>.lock`, so concurrent writers in other processes cannot drop
//! each other's drafts. `save_all` replaces the collection under the same
//! lock and is last-writer-wins.

use std::fs::{self as stdfs, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use fs2::FileExt;
use tokio::fs;
use tracing::{debug, instrument};

use super::catalog::DraftCatalog;
use super::{DraftStore, StoreError};
use crate::domain::Draft;

/// Draft store persisted as a single JSON catalog file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the configured location
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::store_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Load the catalog, including quarantined records
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub async fn load_catalog(&self) -> Result<DraftCatalog, StoreError> {
        if !self.path.exists() {
            debug!("No catalog yet");
            return Ok(DraftCatalog::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(DraftCatalog::new());
        }

        let catalog = DraftCatalog::parse(&content)?;
        debug!(
            drafts = catalog.len(),
            quarantined = catalog.quarantined().len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Run `apply` on the freshly read catalog and write the result, all
    /// under the writer lock
    fn write_locked<R>(
        path: &Path,
        lock_path: &Path,
        apply: impl FnOnce(&mut DraftCatalog) -> R,
    ) -> Result<R, StoreError> {
        if let Some(parent) = path.parent() {
            stdfs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path)?;
        lock.lock_exclusive()?;

        // Re-read under the lock so the quarantine written by others survives
        let mut catalog = match stdfs::read_to_string(path) {
            Ok(content) if !content.trim().is_empty() => DraftCatalog::parse(&content)?,
            Ok(_) => DraftCatalog::new(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => DraftCatalog::new(),
            Err(e) => return Err(e.into()),
        };
        let result = apply(&mut catalog);

        let json = serde_json::to_string_pretty(&catalog.to_document()?)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        let mut tmp = stdfs::File::create(&tmp_path)?;
        tmp.write_all(json.as_bytes())?;
        tmp.sync_all()?;
        stdfs::rename(&tmp_path, path)?;

        // Lock is released when `lock` is dropped
        Ok(result)
    }

    async fn write<R, F>(&self, apply: F) -> Result<R, StoreError>
    where
        R: Send + 'static,
        F: FnOnce(&mut DraftCatalog) -> R + Send + 'static,
    {
        let path = self.path.clone();
        let lock_path = self.lock_path();

        tokio::task::spawn_blocking(move || Self::write_locked(&path, &lock_path, apply))
            .await
            .map_err(|e| StoreError::Unavailable(format!("writer task failed: {}", e)))?
    }
}

#[async_trait]
impl DraftStore for JsonFileStore {
    async fn load_all(&self) -> Result<Vec<Draft>, StoreError> {
        Ok(self.load_catalog().await?.into_drafts())
    }

    #[instrument(skip(self, drafts), fields(path = %self.path.display(), count = drafts.len()))]
    async fn save_all(&self, drafts: Vec<Draft>) -> Result<(), StoreError> {
        self.write(move |catalog| catalog.replace_drafts(drafts)).await?;
        debug!("Catalog written");
        Ok(())
    }

    #[instrument(skip(self, draft), fields(path = %self.path.display(), draft_id = %draft.id()))]
    async fn save_one(&self, draft: Draft) -> Result<bool, StoreError> {
        let replaced = self.write(move |catalog| catalog.upsert(draft)).await?;
        debug!(replaced, "Draft written");
        Ok(replaced)
    }
}
