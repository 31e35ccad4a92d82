use async_trait::async_trait;
use tokio_postgres::{Client, NoTls, Row, error::SqlState};

use super::{NoteStore, StoreError, embedded::migrations};
use crate::models::{Note, NoteDraft};

pub struct PgNoteStore {
    client: Client,
}

impl PgNoteStore {
    pub async fn connect(database_dsn: &str) -> Result<Self, StoreError> {
        let (client, con) = tokio_postgres::connect(database_dsn, NoTls).await?;

        tokio::spawn(async move {
            if let Err(e) = con.await {
                tracing::error!("connection error: {}", e);
            }
        });

        Ok(Self { client })
    }

    pub async fn migrate(&mut self) -> Result<(), StoreError> {
        let migrations_report = migrations::runner().run_async(&mut self.client).await?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }
}

fn note_from_row(row: &Row) -> Note {
    Note {
        id: row.get("id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn classify(e: tokio_postgres::Error) -> StoreError {
    if e.code() == Some(&SqlState::STRING_DATA_RIGHT_TRUNCATION) {
        return StoreError::Constraint(e.to_string());
    }
    StoreError::Database(e)
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn insert(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let row = self
            .client
            .query_one(
                "INSERT INTO notes (title, content) VALUES ($1, $2) \
                 RETURNING id, title, content, created_at, updated_at",
                &[&draft.title, &draft.content],
            )
            .await
            .map_err(classify)?;

        Ok(note_from_row(&row))
    }

    async fn get(&self, id: i64) -> Result<Note, StoreError> {
        let row = self
            .client
            .query_opt(
                "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = $1",
                &[&id],
            )
            .await?;

        row.as_ref()
            .map(note_from_row)
            .ok_or(StoreError::NotFound(id))
    }

    async fn list_recent(&self) -> Result<Vec<Note>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT id, title, content, created_at, updated_at FROM notes \
                 ORDER BY updated_at DESC, id DESC",
                &[],
            )
            .await?;

        Ok(rows.iter().map(note_from_row).collect())
    }

    async fn update(&self, id: i64, draft: NoteDraft) -> Result<Note, StoreError> {
        // GREATEST keeps updated_at monotonic if the server clock steps back.
        let row = self
            .client
            .query_opt(
                "UPDATE notes SET title = $1, content = $2, updated_at = GREATEST(now(), updated_at) \
                 WHERE id = $3 RETURNING id, title, content, created_at, updated_at",
                &[&draft.title, &draft.content, &id],
            )
            .await
            .map_err(classify)?;

        row.as_ref()
            .map(note_from_row)
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let rows = self
            .client
            .execute("DELETE FROM notes WHERE id = $1", &[&id])
            .await?;

        if rows == 1 {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let row = self
            .client
            .query_one("SELECT COUNT(*) AS total FROM notes", &[])
            .await?;
        let total: i64 = row.get("total");

        Ok(usize::try_from(total).unwrap_or_default())
    }
}
