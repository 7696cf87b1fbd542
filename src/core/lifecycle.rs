//! Status transitions and saving.
//!
//! Statuses move freely between draft, published and archived, except that
//! entering `published` requires the draft to pass the publish gate at that
//! moment. The check belongs to the save path: a draft may sit in `draft`
//! while incomplete.
//!
//! Only one save may be outstanding per [`SaveCoordinator`]. A second save
//! issued while one is in flight is rejected with [`SaveError::InFlight`]
//! instead of racing it into the store. A failed save never rolls back the
//! in-memory draft, so the user can retry.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use super::editor::DraftEditor;
use super::validation::{PublishRules, Requirement};
use crate::domain::{Draft, Status};
use crate::store::{DraftStore, StoreError};

/// A save could not be completed
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("A save is already in progress")]
    InFlight,

    #[error("Store rejected the save: {0}")]
    Store(#[from] StoreError),
}

/// A status change could not be completed
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Draft is not ready to publish: {}", describe(.0))]
    Blocked(Vec<Requirement>),

    #[error(transparent)]
    Save(#[from] SaveError),
}

fn describe(unmet: &[Requirement]) -> String {
    unmet
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check whether `draft` may move to `target`
pub fn check_transition(
    draft: &Draft,
    target: Status,
    rules: &PublishRules,
) -> Result<(), PublishError> {
    if target == Status::Published {
        let report = rules.check(draft);
        if !report.is_publishable() {
            return Err(PublishError::Blocked(report.unmet));
        }
    }
    Ok(())
}

/// Serializes saves of drafts into a store
pub struct SaveCoordinator<S: ?Sized> {
    store: Arc<S>,
    rules: PublishRules,
    in_flight: Mutex<()>,
}

impl<S: DraftStore + ?Sized> SaveCoordinator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_rules(store, PublishRules::default())
    }

    pub fn with_rules(store: Arc<S>, rules: PublishRules) -> Self {
        Self {
            store,
            rules,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn rules(&self) -> &PublishRules {
        &self.rules
    }

    /// Whether a save is currently outstanding
    pub fn is_saving(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    /// Persist one snapshot: read the full collection, upsert by id, write
    /// the full collection back.
    #[instrument(skip(self, snapshot), fields(draft_id = %snapshot.id()))]
    pub async fn save_snapshot(&self, snapshot: Draft) -> Result<(), SaveError> {
        let _guard = self.in_flight.try_lock().map_err(|_| {
            warn!("Save rejected: another save is in flight");
            SaveError::InFlight
        })?;

        let replaced = self.store.save_one(snapshot).await?;

        info!(replaced, "Draft saved");
        Ok(())
    }

    /// Save the editor's current state without changing status
    pub async fn save(&self, editor: &DraftEditor) -> Result<(), SaveError> {
        self.save_snapshot(editor.snapshot()).await
    }

    /// Save with a new status.
    ///
    /// The status is applied to the editor only once the store accepted the
    /// save; on any failure the editor is left exactly as it was.
    #[instrument(skip(self, editor), fields(draft_id = %editor.draft().id(), %target))]
    pub async fn save_as(&self, editor: &mut DraftEditor, target: Status) -> Result<(), PublishError> {
        check_transition(editor.draft(), target, &self.rules).inspect_err(|e| {
            warn!(error = %e, "Status change blocked");
        })?;

        let mut staged = editor.clone();
        staged.set_status(target);
        self.save_snapshot(staged.snapshot()).await?;

        *editor = staged;
        info!("Status changed");
        Ok(())
    }

    pub async fn publish(&self, editor: &mut DraftEditor) -> Result<(), PublishError> {
        self.save_as(editor, Status::Published).await
    }

    pub async fn archive(&self, editor: &mut DraftEditor) -> Result<(), PublishError> {
        self.save_as(editor, Status::Archived).await
    }

    pub async fn unpublish(&self, editor: &mut DraftEditor) -> Result<(), PublishError> {
        self.save_as(editor, Status::Draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_only_published_is_gated() {
        let draft = Draft::new();
        let rules = PublishRules::default();
        assert!(check_transition(&draft, Status::Draft, &rules).is_ok());
        assert!(check_transition(&draft, Status::Archived, &rules).is_ok());
        assert!(matches!(
            check_transition(&draft, Status::Published, &rules),
            Err(PublishError::Blocked(unmet)) if unmet.len() == 6
        ));
    }

    #[tokio::test]
    async fn test_archive_and_back() {
        let store = Arc::new(MemoryStore::new());
        let saver = SaveCoordinator::new(store.clone());
        let mut editor = DraftEditor::new();

        saver.archive(&mut editor).await.unwrap();
        assert_eq!(editor.draft().status(), Status::Archived);

        saver.unpublish(&mut editor).await.unwrap();
        assert_eq!(editor.draft().status(), Status::Draft);

        let stored = store.load_one(editor.draft().id()).await.unwrap();
        assert_eq!(stored.status(), Status::Draft);
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_store_failure_keeps_editor_state() {
        let store = Arc::new(MemoryStore::new());
        store.set_failing(true);
        let saver = SaveCoordinator::new(store.clone());

        let mut editor = DraftEditor::new();
        editor.rename("Unsaved work").unwrap();
        let before = editor.snapshot();

        let err = saver.archive(&mut editor).await.unwrap_err();
        assert!(matches!(err, PublishError::Save(SaveError::Store(_))));
        assert_eq!(editor.draft(), &before);
        assert!(!saver.is_saving());

        store.set_failing(false);
        saver.save(&editor).await.unwrap();
        assert_eq!(
            store.load_one(before.id()).await.unwrap().name(),
            "Unsaved work"
        );
    }
}
