//! Pet profile, pet and mood submissions, and the modal dialogs

use ntex::web;
use ntex_identity::Identity;
use serde::Deserialize;
use uuid::Uuid;

use crate::front::{
    AppState, errors,
    forms::{mood::MoodForm, pet::PetForm},
    middleware,
    modals::{CloseReason, ModalKind},
    session, utils,
};

#[web::get("/{pet_id}")]
async fn get_pet_profile_view(
    req: web::HttpRequest,
    path: web::types::Path<(Uuid,)>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.open_pet_profile(path.0).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::post("")]
async fn create_pet(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    form: web::types::Form<PetForm>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_add_pet(form.into_inner()).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::post("/{pet_id}")]
async fn edit_pet(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    path: web::types::Path<(Uuid,)>,
    form: web::types::Form<PetForm>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_edit_pet(path.0, form.into_inner()).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Confirmed delete, second step after the confirm modal
#[web::post("/{pet_id}/delete")]
async fn delete_pet(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    path: web::types::Path<(Uuid,)>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_delete(path.0).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::post("/{pet_id}/mood")]
async fn log_mood(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    path: web::types::Path<(Uuid,)>,
    form: web::types::Form<MoodForm>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_mood(path.0, form.into_inner()).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::get("/add-pet")]
async fn open_add_pet_modal(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.open_add_pet();

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Edit modal of the current pet
#[web::get("/edit-pet")]
async fn open_edit_pet_modal(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.open_edit_pet().await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Mood modal of the current pet
#[web::get("/mood")]
async fn open_mood_modal(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.open_mood_modal().await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::get("/confirm-delete/{pet_id}")]
async fn open_confirm_delete_modal(
    req: web::HttpRequest,
    path: web::types::Path<(Uuid,)>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.open_confirm_delete(path.0).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[derive(Deserialize, Debug)]
struct CloseQuery {
    reason: Option<CloseReason>,
}

/// Close button, backdrop click or Escape
#[web::get("/{modal}/close")]
async fn close_modal(
    req: web::HttpRequest,
    path: web::types::Path<(String,)>,
    q: web::types::Query<CloseQuery>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let kind = path
        .0
        .parse::<ModalKind>()
        .map_err(|e| errors::UserError::InvalidPathValue(e.to_string()))?;

    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.close_modal(kind, q.reason);

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}
