use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use std::collections::BTreeMap;

use super::{NoteStore, StoreError};
use crate::models::{Note, NoteDraft, TITLE_MAX_LENGTH};

#[derive(Default)]
struct Inner {
    last_id: i64,
    notes: BTreeMap<i64, Note>,
}

/// Process-local store. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryNoteStore {
    inner: RwLock<Inner>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_title(draft: &NoteDraft) -> Result<(), StoreError> {
    let len = draft.title.chars().count();
    if len > TITLE_MAX_LENGTH {
        return Err(StoreError::Constraint(format!(
            "title is {len} characters, column allows {TITLE_MAX_LENGTH}"
        )));
    }
    Ok(())
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        check_title(&draft)?;

        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let note = Note {
            id: inner.last_id,
            title: draft.title,
            content: draft.content,
            created_at: now,
            updated_at: now,
        };
        inner.notes.insert(note.id, note.clone());

        Ok(note)
    }

    async fn get(&self, id: i64) -> Result<Note, StoreError> {
        self.inner
            .read()
            .await
            .notes
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_recent(&self) -> Result<Vec<Note>, StoreError> {
        let mut notes: Vec<Note> = self.inner.read().await.notes.values().cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(notes)
    }

    async fn update(&self, id: i64, draft: NoteDraft) -> Result<Note, StoreError> {
        check_title(&draft)?;

        let mut inner = self.inner.write().await;
        let note = inner.notes.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        note.title = draft.title;
        note.content = draft.content;
        note.updated_at = Utc::now().max(note.updated_at);

        Ok(note.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .notes
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.notes.len())
    }
}
