pub mod notes;

use axum::{
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{Html, IntoResponse, Response},
};

use crate::{error::AppError, messages::Messages, templates};

/// Note id taken from the path. Only a run of ASCII digits that fits in an
/// `i64` is accepted; anything else is answered with the not-found page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteId(pub i64);

impl NoteId {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(Self)
    }
}

impl<S> FromRequestParts<S> for NoteId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        Self::parse(&raw).ok_or(AppError::NotFound)
    }
}

/// Renders `body` inside the page layout, showing and clearing pending messages.
pub fn render(messages: &Messages, title: &str, body: &str) -> Response {
    let mut response = (StatusCode::OK, Html(templates::layout(title, messages, body))).into_response();
    messages.consume(&mut response);
    response
}

pub async fn not_found() -> Response {
    AppError::NotFound.into_response()
}
