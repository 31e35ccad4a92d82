use serde::Deserialize;

use std::collections::BTreeMap;

use crate::{
    models::{Note, NoteDraft, TITLE_MAX_LENGTH},
    repository::StoreError,
    service::NoteService,
};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Text columns cannot hold NUL, so such input is refused at the form.
pub const NULL_CHARACTERS_MESSAGE: &str = "Null characters are not allowed.";

/// How a field is presented on the note form.
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub class: &'static str,
}

pub const TITLE_FIELD: FieldSpec = FieldSpec {
    name: "title",
    label: "Title",
    placeholder: "Enter note title...",
    class: "form-control form-control-lg",
};

pub const CONTENT_FIELD: FieldSpec = FieldSpec {
    name: "content",
    label: "Content",
    placeholder: "Enter note content...",
    class: "form-control",
};

pub const CONTENT_ROWS: u32 = 12;

/// Raw title/content as submitted by the browser. Missing fields bind as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Field name to error messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A form whose fields passed validation and can be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidNoteForm {
    draft: NoteDraft,
}

impl NoteForm {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Form pre-populated from an existing note.
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }

    pub fn validate(&self) -> Result<ValidNoteForm, FormErrors> {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        let title_len = title.chars().count();
        if title.is_empty() {
            errors.add(TITLE_FIELD.name, REQUIRED_MESSAGE);
        } else if title_len > TITLE_MAX_LENGTH {
            errors.add(
                TITLE_FIELD.name,
                format!(
                    "Ensure this value has at most {TITLE_MAX_LENGTH} characters (it has {title_len})."
                ),
            );
        } else if title.contains('\0') {
            errors.add(TITLE_FIELD.name, NULL_CHARACTERS_MESSAGE);
        }

        if self.content.contains('\0') {
            errors.add(CONTENT_FIELD.name, NULL_CHARACTERS_MESSAGE);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidNoteForm {
            draft: NoteDraft::new(title, self.content.clone()),
        })
    }
}

impl ValidNoteForm {
    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn content(&self) -> &str {
        &self.draft.content
    }

    /// Creates a note, or rewrites `instance` in place when editing.
    pub async fn save(
        self,
        service: &NoteService,
        instance: Option<&Note>,
    ) -> Result<Note, StoreError> {
        match instance {
            Some(note) => service.update(note.id, self.draft).await,
            None => service.create(self.draft).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryNoteStore;

    use std::sync::Arc;

    #[test]
    fn valid_with_title_and_content() {
        let form = NoteForm::new("Test Note", "Test content");

        let valid = form.validate().unwrap();

        assert_eq!(valid.title(), "Test Note");
        assert_eq!(valid.content(), "Test content");
    }

    #[test]
    fn empty_title_is_required() {
        let errors = NoteForm::new("", "Some content").validate().unwrap_err();

        assert_eq!(errors.field("title"), [REQUIRED_MESSAGE]);
        assert!(errors.field("content").is_empty());
    }

    #[test]
    fn whitespace_only_title_is_required() {
        let errors = NoteForm::new("   \t", "x").validate().unwrap_err();

        assert!(errors.field("title")[0].to_lowercase().contains("required"));
    }

    #[test]
    fn title_is_trimmed() {
        let valid = NoteForm::new("  Padded  ", "").validate().unwrap();

        assert_eq!(valid.title(), "Padded");
    }

    #[test]
    fn empty_content_is_allowed() {
        let valid = NoteForm::new("Some title", "").validate().unwrap();

        assert_eq!(valid.content(), "");
    }

    #[test]
    fn content_is_kept_verbatim() {
        let content = "  milk\neggs\n\n";

        let valid = NoteForm::new("Groceries", content).validate().unwrap();

        assert_eq!(valid.content(), content);
    }

    #[test]
    fn title_at_column_width_is_accepted() {
        let title = "é".repeat(TITLE_MAX_LENGTH);

        assert!(NoteForm::new(title, "").validate().is_ok());
    }

    #[test]
    fn title_over_column_width_is_rejected() {
        let errors = NoteForm::new("a".repeat(TITLE_MAX_LENGTH + 1), "")
            .validate()
            .unwrap_err();

        assert_eq!(
            errors.field("title"),
            ["Ensure this value has at most 255 characters (it has 256)."]
        );
    }

    #[test]
    fn null_characters_are_rejected_per_field() {
        let errors = NoteForm::new("T\0itle", "a\0b").validate().unwrap_err();

        assert_eq!(errors.field("title"), [NULL_CHARACTERS_MESSAGE]);
        assert_eq!(errors.field("content"), [NULL_CHARACTERS_MESSAGE]);
    }

    #[test]
    fn null_in_content_alone_is_rejected() {
        let errors = NoteForm::new("Title", "a\0b").validate().unwrap_err();

        assert!(errors.field("title").is_empty());
        assert_eq!(errors.field("content"), [NULL_CHARACTERS_MESSAGE]);
    }

    #[test]
    fn field_labels() {
        assert_eq!(TITLE_FIELD.label, "Title");
        assert_eq!(CONTENT_FIELD.label, "Content");
    }

    #[tokio::test]
    async fn save_without_instance_creates() {
        let service = NoteService::new(Arc::new(MemoryNoteStore::new()));

        let note = NoteForm::new("Saved Note", "Saved content")
            .validate()
            .unwrap()
            .save(&service, None)
            .await
            .unwrap();

        assert_eq!(note.title, "Saved Note");
        assert_eq!(note.content, "Saved content");
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn save_with_instance_updates_in_place() {
        let service = NoteService::new(Arc::new(MemoryNoteStore::new()));
        let original = service
            .create(NoteDraft::new("Original", "Original content"))
            .await
            .unwrap();

        let saved = NoteForm::new("Updated", "Updated content")
            .validate()
            .unwrap()
            .save(&service, Some(&original))
            .await
            .unwrap();

        assert_eq!(saved.id, original.id);
        assert_eq!(saved.title, "Updated");
        assert_eq!(saved.created_at, original.created_at);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[test]
    fn from_note_prefills_fields() {
        let now = chrono::Utc::now();
        let note = Note {
            id: 3,
            title: "Existing".to_string(),
            content: "Body".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(NoteForm::from_note(&note), NoteForm::new("Existing", "Body"));
    }
}
