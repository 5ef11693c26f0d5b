//! Handlers not linked to a specific entity: page load, navigation and
//! language

use ntex::web;
use ntex_files::NamedFile;
use ntex_identity::Identity;

use crate::{
    front::{AppState, errors, middleware, session, state::NavPage, utils},
    i18n::Locale,
};

/// Serve `favicon.svg`
#[web::get("/favicon.svg")]
async fn serve_favicon() -> Result<impl web::Responder, web::Error> {
    Ok(NamedFile::open("web/static/images/favicon.svg")?)
}

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}

/// Page load: dashboard when the stored session is still valid, login
/// otherwise
#[web::get("/")]
async fn index(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.init().await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Bottom navigation: `home`, `profile` or `settings`
#[web::get("/nav/{page}")]
async fn navigate(
    req: web::HttpRequest,
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let page = path
        .0
        .parse::<NavPage>()
        .map_err(|e| errors::UserError::InvalidPathValue(e.to_string()))?;

    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.navigate(page).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Stores the language preference and renders the current screen again
#[web::post("/language/{language}")]
async fn set_language(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    path: web::types::Path<(String,)>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let locale = Locale::parse(&path.0)
        .ok_or_else(|| errors::UserError::InvalidPathValue(path.0.to_string()))?;

    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.set_language(locale).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}
