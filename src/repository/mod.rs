mod embedded;
mod memory;
mod postgres;

pub use memory::MemoryNoteStore;
pub use postgres::PgNoteStore;

use async_trait::async_trait;

use crate::models::{Note, NoteDraft};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("note {0} not found")]
    NotFound(i64),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] refinery::Error),
}

impl StoreError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Persistence for notes.
///
/// Every operation that addresses a single note by id fails with
/// [`StoreError::NotFound`] when no such note exists, including `delete`.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Stores a new note, assigning its id and both timestamps.
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError>;

    async fn get(&self, id: i64) -> Result<Note, StoreError>;

    /// All notes, most recently updated first. Ties are ordered by id, newest first.
    async fn list_recent(&self) -> Result<Vec<Note>, StoreError>;

    /// Rewrites title and content and refreshes `updated_at`.
    async fn update(&self, id: i64, draft: NoteDraft) -> Result<Note, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
