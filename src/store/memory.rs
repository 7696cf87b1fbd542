//! In-memory draft store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DraftStore, StoreError};
use crate::domain::Draft;

/// Volatile store, used for embedding and in tests.
///
/// Saves can be slowed down or made to fail to exercise the save path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    drafts: RwLock<Vec<Draft>>,
    save_delay: Option<Duration>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `drafts`
    pub fn with_drafts(drafts: Vec<Draft>) -> Self {
        Self {
            drafts: RwLock::new(drafts),
            ..Self::default()
        }
    }

    /// Every save sleeps for `delay` before committing
    pub fn with_save_delay(mut self, delay: Duration) -> Self {
        self.save_delay = Some(delay);
        self
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    /// Number of committed saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DraftStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Draft>, StoreError> {
        Ok(self.drafts.read().await.clone())
    }

    async fn save_all(&self, drafts: Vec<Draft>) -> Result<(), StoreError> {
        if let Some(delay) = self.save_delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store set to fail".into()));
        }

        *self.drafts.write().await = drafts;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
