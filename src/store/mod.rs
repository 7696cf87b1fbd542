//! Draft persistence.
//!
//! A [`DraftStore`] is a whole-collection document store keyed by draft id.
//! Writers read the full collection, upsert one draft by id and write the
//! full collection back; there are no partial-record updates.
//!
//! # Storage Layout
//!
//! ```text
//! ~/.promptcraft/
//! ├── config.yaml        # optional, see `config`
//! ├── drafts.json        # versioned catalog of drafts
//! └── drafts.json.lock   # writer lock
//! ```

pub mod catalog;
pub mod file;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Draft;

pub use catalog::{DraftCatalog, DraftFilter, QuarantinedRecord};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Errors surfaced by a draft store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Draft not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Backend that persists drafts
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Every decodable draft in the store
    async fn load_all(&self) -> Result<Vec<Draft>, StoreError>;

    /// One draft by id
    async fn load_one(&self, id: Uuid) -> Result<Draft, StoreError> {
        self.load_all()
            .await?
            .into_iter()
            .find(|d| d.id() == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Replace the whole collection
    async fn save_all(&self, drafts: Vec<Draft>) -> Result<(), StoreError>;

    /// Read the collection, upsert `draft` by id and write it back.
    ///
    /// Returns `true` when an existing draft was replaced. Backends shared
    /// between processes override this to run the whole cycle under one lock.
    async fn save_one(&self, draft: Draft) -> Result<bool, StoreError> {
        let mut drafts = self.load_all().await?;
        let replaced = upsert(&mut drafts, draft);
        self.save_all(drafts).await?;
        Ok(replaced)
    }
}

/// Replace the draft with the same id in place, or append it
pub fn upsert(drafts: &mut Vec<Draft>, draft: Draft) -> bool {
    if let Some(existing) = drafts.iter_mut().find(|d| d.id() == draft.id()) {
        *existing = draft;
        true
    } else {
        drafts.push(draft);
        false
    }
}
