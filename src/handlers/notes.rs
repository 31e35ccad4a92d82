use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use super::{NoteId, render};
use crate::{
    error::AppError,
    forms::{FormErrors, NoteForm},
    messages::{FlashMessage, Messages},
    service::NoteService,
    templates,
};

#[debug_handler]
pub async fn note_list(
    State(service): State<Arc<NoteService>>,
    messages: Messages,
) -> Result<Response, AppError> {
    let notes = service.get_recent().await?;
    Ok(render(&messages, "My Notes", &templates::note_list(&notes)))
}

#[debug_handler]
pub async fn note_detail(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    messages: Messages,
) -> Result<Response, AppError> {
    let note = service.get(id).await?;
    Ok(render(&messages, &note.title, &templates::note_detail(&note)))
}

#[debug_handler]
pub async fn note_create_form(messages: Messages) -> Response {
    let body = templates::note_form(&NoteForm::default(), &FormErrors::default(), None);
    render(&messages, "Create Note", &body)
}

#[debug_handler]
pub async fn note_create(
    State(service): State<Arc<NoteService>>,
    messages: Messages,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    match form.validate() {
        Ok(valid) => {
            valid.save(&service, None).await?;
            Ok(messages
                .add(FlashMessage::NoteCreated)
                .redirect(templates::LIST_URL))
        }
        Err(errors) => {
            tracing::debug!("rejected note submission: {:?}", errors);
            let body = templates::note_form(&form, &errors, None);
            Ok(render(&messages, "Create Note", &body))
        }
    }
}

#[debug_handler]
pub async fn note_update_form(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    messages: Messages,
) -> Result<Response, AppError> {
    let note = service.get(id).await?;
    let body = templates::note_form(&NoteForm::from_note(&note), &FormErrors::default(), Some(&note));
    Ok(render(&messages, "Edit Note", &body))
}

#[debug_handler]
pub async fn note_update(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    messages: Messages,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let note = service.get(id).await?;
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    match form.validate() {
        Ok(valid) => {
            let saved = valid.save(&service, Some(&note)).await?;
            Ok(messages
                .add(FlashMessage::NoteUpdated)
                .redirect(&templates::note_url(saved.id)))
        }
        Err(errors) => {
            tracing::debug!("rejected update of note {}: {:?}", id, errors);
            let body = templates::note_form(&form, &errors, Some(&note));
            Ok(render(&messages, "Edit Note", &body))
        }
    }
}

#[debug_handler]
pub async fn note_delete_confirm(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    messages: Messages,
) -> Result<Response, AppError> {
    let note = service.get(id).await?;
    Ok(render(&messages, "Delete Note", &templates::confirm_delete(&note)))
}

#[debug_handler]
pub async fn note_delete(
    State(service): State<Arc<NoteService>>,
    NoteId(id): NoteId,
    messages: Messages,
) -> Result<Response, AppError> {
    service.delete(id).await?;
    Ok(messages
        .add(FlashMessage::NoteDeleted)
        .redirect(templates::LIST_URL))
}
