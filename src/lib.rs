pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod messages;
pub mod models;
pub mod repository;
pub mod service;
pub mod templates;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use handlers::notes;
use service::NoteService;

pub fn router(service: Arc<NoteService>) -> Router {
    Router::new()
        .route("/", get(notes::note_list))
        .route(
            "/note/create/",
            get(notes::note_create_form).post(notes::note_create),
        )
        .route("/note/{id}/", get(notes::note_detail))
        .route(
            "/note/{id}/update/",
            get(notes::note_update_form).post(notes::note_update),
        )
        .route(
            "/note/{id}/delete/",
            get(notes::note_delete_confirm).post(notes::note_delete),
        )
        .fallback(handlers::not_found)
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}
