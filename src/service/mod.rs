use crate::{
    models::{Note, NoteDraft},
    repository::{NoteStore, StoreError},
};

use std::sync::Arc;

#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
}

impl NoteService {
    pub const fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// All notes, most recently modified first.
    pub async fn get_recent(&self) -> Result<Vec<Note>, StoreError> {
        self.store.list_recent().await
    }

    pub async fn get(&self, id: i64) -> Result<Note, StoreError> {
        self.store.get(id).await
    }

    pub async fn create(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let note = self.store.insert(draft).await?;
        tracing::info!("created note {}", note.id);
        Ok(note)
    }

    pub async fn update(&self, id: i64, draft: NoteDraft) -> Result<Note, StoreError> {
        let note = self.store.update(id, draft).await?;
        tracing::info!("updated note {}", note.id);
        Ok(note)
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id).await?;
        tracing::info!("deleted note {}", id);
        Ok(())
    }

    pub async fn count(&self) -> Result<usize, StoreError> {
        self.store.count().await
    }
}
