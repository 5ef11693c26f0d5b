//! Login, registration and sign-out screens

use ntex::web;
use ntex_identity::Identity;

use crate::front::{
    AppState,
    forms::user::{LoginForm, RegisterForm},
    middleware, session, utils,
};

#[web::get("/login")]
async fn get_login_view(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.show_login();

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::post("/login")]
async fn login(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    form: web::types::Form<LoginForm>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_login(form.into_inner()).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::get("/register")]
async fn get_register_view(
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.show_register();

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

#[web::post("/register")]
async fn register(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    form: web::types::Form<RegisterForm>,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.submit_register(form.into_inner()).await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}

/// Close user session; the page asks for confirmation before posting
#[web::post("/sign-out")]
async fn sign_out(
    _: middleware::csrf_token::CsrfToken,
    req: web::HttpRequest,
    app_state: web::types::State<AppState>,
    cookie: ntex_session::Session,
    identity: Identity,
) -> Result<impl web::Responder, web::Error> {
    let backend = app_state.backend_for(session::restore_auth_session(&identity));
    let mut controller = app_state.controller(&backend, &cookie, req.headers());

    controller.sign_out().await;

    utils::render_page(controller, &app_state, &backend, &cookie, &identity).await
}
