//! Single-use success messages shown on the page that follows a redirect.
//!
//! Pending messages travel in a cookie as a `.`-separated list of codes.
//! A rendered page shows them once and clears the cookie.

use axum::{
    extract::FromRequestParts,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, LOCATION, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
};

use std::convert::Infallible;

pub const COOKIE_NAME: &str = "notes_messages";

const COOKIE_ATTRIBUTES: &str = "Path=/; HttpOnly; SameSite=Lax";

/// Joins codes inside the cookie value; must be a valid cookie-octet.
const CODE_SEPARATOR: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashMessage {
    NoteCreated,
    NoteUpdated,
    NoteDeleted,
}

impl FlashMessage {
    const ALL: [Self; 3] = [Self::NoteCreated, Self::NoteUpdated, Self::NoteDeleted];

    pub const fn code(self) -> &'static str {
        match self {
            Self::NoteCreated => "note_created",
            Self::NoteUpdated => "note_updated",
            Self::NoteDeleted => "note_deleted",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.code() == code)
    }

    pub const fn text(self) -> &'static str {
        match self {
            Self::NoteCreated => "Note created successfully!",
            Self::NoteUpdated => "Note updated successfully!",
            Self::NoteDeleted => "Note deleted successfully!",
        }
    }

    /// Alert level of every message the views emit.
    pub const LEVEL: &'static str = "success";
}

/// Messages pending for the current client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Messages {
    pending: Vec<FlashMessage>,
}

impl Messages {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pending = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == COOKIE_NAME)
            .flat_map(|(_, codes)| codes.split(CODE_SEPARATOR))
            .filter_map(FlashMessage::from_code)
            .collect();

        Self { pending }
    }

    #[must_use]
    pub fn add(mut self, message: FlashMessage) -> Self {
        self.pending.push(message);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = FlashMessage> + '_ {
        self.pending.iter().copied()
    }

    /// `302 Found` to `location`, carrying the pending messages.
    pub fn redirect(self, location: &str) -> Response {
        let codes: Vec<&str> = self.pending.iter().map(|m| m.code()).collect();
        let cookie = format!("{COOKIE_NAME}={}; {COOKIE_ATTRIBUTES}", codes.join(CODE_SEPARATOR));

        (
            StatusCode::FOUND,
            [(LOCATION, location.to_string()), (SET_COOKIE, cookie)],
        )
            .into_response()
    }

    /// Marks the messages as shown by expiring the cookie on `response`.
    pub fn consume(&self, response: &mut Response) {
        if self.is_empty() {
            return;
        }
        let cleared = format!("{COOKIE_NAME}=; Max-Age=0; {COOKIE_ATTRIBUTES}");
        if let Ok(value) = HeaderValue::from_str(&cleared) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
}

impl<S> FromRequestParts<S> for Messages
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
