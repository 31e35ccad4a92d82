//! HTML pages. Every piece of user-provided text passes through [`escape`].

use chrono::{DateTime, Utc};

use std::fmt::Write;

use crate::{
    forms::{CONTENT_FIELD, CONTENT_ROWS, FieldSpec, FormErrors, NoteForm, TITLE_FIELD},
    messages::{FlashMessage, Messages},
    models::{Note, TITLE_MAX_LENGTH},
};

const PREVIEW_CHARS: usize = 100;

pub const EMPTY_STATE: &str = "No notes yet. Create your first note!";

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `text` and turns each line break into `<br>`.
pub fn linebreaks(text: &str) -> String {
    escape(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>\n")
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return escape(text);
    }
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}&hellip;", escape(head.trim_end()))
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%b %-d, %Y, %H:%M UTC").to_string()
}

pub fn note_url(id: i64) -> String {
    format!("/note/{id}/")
}

pub fn update_url(id: i64) -> String {
    format!("/note/{id}/update/")
}

pub fn delete_url(id: i64) -> String {
    format!("/note/{id}/delete/")
}

pub const LIST_URL: &str = "/";
pub const CREATE_URL: &str = "/note/create/";

/// Wraps `body` in the shared page layout and shows any pending messages.
pub fn layout(title: &str, messages: &Messages, body: &str) -> String {
    let mut alerts = String::new();
    for message in messages.iter() {
        let _ = writeln!(
            alerts,
            "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
            FlashMessage::LEVEL,
            escape(message.text())
        );
    }

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title} | Sticky Notes</title>\n\
</head>\n\
<body>\n\
<nav class=\"navbar\"><a class=\"navbar-brand\" href=\"{LIST_URL}\">My Notes</a> \
<a class=\"btn btn-primary\" href=\"{CREATE_URL}\">New Note</a></nav>\n\
<main class=\"container\">\n\
<div class=\"messages\">\n{alerts}</div>\n\
{body}\
</main>\n\
</body>\n\
</html>\n",
        title = escape(title),
    )
}

pub fn note_list(notes: &[Note]) -> String {
    if notes.is_empty() {
        return format!(
            "<h1>My Notes</h1>\n<p class=\"empty-state\">{EMPTY_STATE}</p>\n\
<a class=\"btn btn-primary\" href=\"{CREATE_URL}\">Create Note</a>\n"
        );
    }

    let mut cards = String::new();
    for note in notes {
        let _ = write!(
            cards,
            "<article class=\"note-card\">\n\
<h2><a href=\"{url}\">{title}</a></h2>\n\
<p class=\"note-preview\">{preview}</p>\n\
<p class=\"note-meta\">Updated {updated}</p>\n\
</article>\n",
            url = note_url(note.id),
            title = escape(&note.title),
            preview = preview(&note.content),
            updated = timestamp(&note.updated_at),
        );
    }

    format!("<h1>My Notes</h1>\n<section class=\"notes\">\n{cards}</section>\n")
}

pub fn note_detail(note: &Note) -> String {
    format!(
        "<article class=\"note-detail\">\n\
<h1>{title}</h1>\n\
<div class=\"note-content\">{content}</div>\n\
<p class=\"note-meta\">Created {created} &middot; Updated {updated}</p>\n\
<a class=\"btn btn-secondary\" href=\"{edit}\">Edit</a>\n\
<a class=\"btn btn-danger\" href=\"{delete}\">Delete</a>\n\
<a class=\"btn btn-link\" href=\"{LIST_URL}\">Back to notes</a>\n\
</article>\n",
        title = escape(&note.title),
        content = linebreaks(&note.content),
        created = timestamp(&note.created_at),
        updated = timestamp(&note.updated_at),
        edit = update_url(note.id),
        delete = delete_url(note.id),
    )
}

fn field_errors(errors: &FormErrors, field: &FieldSpec) -> String {
    let messages = errors.field(field.name);
    if messages.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul class=\"errorlist\">");
    for message in messages {
        let _ = write!(out, "<li>{}</li>", escape(message));
    }
    out.push_str("</ul>\n");
    out
}

/// Create form when `note` is `None`, edit form for `note` otherwise.
pub fn note_form(form: &NoteForm, errors: &FormErrors, note: Option<&Note>) -> String {
    let (heading, action, cancel) = match note {
        Some(note) => ("Edit Note", update_url(note.id), note_url(note.id)),
        None => ("Create Note", CREATE_URL.to_string(), LIST_URL.to_string()),
    };

    format!(
        "<h1>{heading}</h1>\n\
<form method=\"post\" action=\"{action}\">\n\
<div class=\"form-group\">\n\
<label for=\"id_{t_name}\">{t_label}</label>\n\
{t_errors}\
<input type=\"text\" name=\"{t_name}\" id=\"id_{t_name}\" class=\"{t_class}\" placeholder=\"{t_placeholder}\" \
maxlength=\"{TITLE_MAX_LENGTH}\" required value=\"{t_value}\">\n\
</div>\n\
<div class=\"form-group\">\n\
<label for=\"id_{c_name}\">{c_label}</label>\n\
{c_errors}\
<textarea name=\"{c_name}\" id=\"id_{c_name}\" class=\"{c_class}\" rows=\"{CONTENT_ROWS}\" placeholder=\"{c_placeholder}\">\n\
{c_value}</textarea>\n\
</div>\n\
<button type=\"submit\" class=\"btn btn-primary\">Save</button>\n\
<a class=\"btn btn-link\" href=\"{cancel}\">Cancel</a>\n\
</form>\n",
        t_name = TITLE_FIELD.name,
        t_label = TITLE_FIELD.label,
        t_class = TITLE_FIELD.class,
        t_placeholder = TITLE_FIELD.placeholder,
        t_errors = field_errors(errors, &TITLE_FIELD),
        t_value = escape(&form.title),
        c_name = CONTENT_FIELD.name,
        c_label = CONTENT_FIELD.label,
        c_class = CONTENT_FIELD.class,
        c_placeholder = CONTENT_FIELD.placeholder,
        c_errors = field_errors(errors, &CONTENT_FIELD),
        c_value = escape(&form.content),
    )
}

pub fn confirm_delete(note: &Note) -> String {
    format!(
        "<h1>Delete Note</h1>\n\
<p>Are you sure you want to delete &quot;{title}&quot;? This cannot be undone.</p>\n\
<form method=\"post\" action=\"{action}\">\n\
<button type=\"submit\" class=\"btn btn-danger\">Yes, delete</button>\n\
<a class=\"btn btn-link\" href=\"{cancel}\">Cancel</a>\n\
</form>\n",
        title = escape(&note.title),
        action = delete_url(note.id),
        cancel = note_url(note.id),
    )
}

pub fn not_found() -> String {
    layout(
        "Not Found",
        &Messages::default(),
        "<h1>Not Found</h1>\n<p>The requested page was not found on this server.</p>\n",
    )
}

pub fn server_error() -> String {
    layout(
        "Server Error",
        &Messages::default(),
        "<h1>Server Error (500)</h1>\n<p>Something went wrong. Please try again later.</p>\n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(title: &str, content: &str) -> Note {
        let now = Utc::now();
        Note {
            id: 42,
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert(\"x\") & 'y'</script>"),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn linebreaks_keeps_lines_apart() {
        assert_eq!(linebreaks("milk\neggs"), "milk<br>\neggs");
        assert_eq!(linebreaks("a\r\nb"), "a<br>\nb");
    }

    #[test]
    fn empty_list_shows_empty_state() {
        assert!(note_list(&[]).contains("No notes yet"));
    }

    #[test]
    fn list_links_each_note() {
        let html = note_list(&[note("Groceries", "milk")]);

        assert!(html.contains("href=\"/note/42/\""));
        assert!(html.contains("Groceries"));
    }

    #[test]
    fn long_content_is_previewed() {
        let html = note_list(&[note("Long", &"x".repeat(5000))]);

        assert!(html.contains("&hellip;"));
        assert!(!html.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[test]
    fn detail_escapes_content() {
        let html = note_detail(&note("T", "<script>alert(1)</script>"));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn edit_form_targets_the_note() {
        let n = note("Existing", "Body");

        let html = note_form(&NoteForm::from_note(&n), &FormErrors::default(), Some(&n));

        assert!(html.contains("Edit Note"));
        assert!(html.contains("action=\"/note/42/update/\""));
        assert!(html.contains("value=\"Existing\""));
        assert!(html.contains("Body</textarea>"));
    }

    #[test]
    fn create_form_shows_field_metadata() {
        let html = note_form(&NoteForm::default(), &FormErrors::default(), None);

        assert!(html.contains("Create Note"));
        assert!(html.contains("placeholder=\"Enter note title...\""));
        assert!(html.contains("rows=\"12\""));
        assert!(html.contains("maxlength=\"255\""));
    }

    #[test]
    fn layout_renders_messages() {
        let messages = Messages::default().add(FlashMessage::NoteCreated);

        let html = layout("My Notes", &messages, "");

        assert!(html.contains("alert-success"));
        assert!(html.contains("Note created successfully!"));
    }
}
