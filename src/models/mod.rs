use chrono::{DateTime, Utc};

use std::fmt;

/// Column width of `notes.title`.
pub const TITLE_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

/// The user-editable part of a note, as written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_displays_as_its_title() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "Test Note".to_string(),
            content: "body".to_string(),
            created_at: now,
            updated_at: now,
        };

        assert_eq!(note.to_string(), "Test Note");
    }
}
