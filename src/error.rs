use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{repository::StoreError, templates};

/// Failure of a page request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (StatusCode::NOT_FOUND, Html(templates::not_found())).into_response(),
            Self::Store(e) => {
                tracing::error!("store operation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::server_error()),
                )
                    .into_response()
            }
        }
    }
}
