pub mod auth;
pub mod components;
pub mod controller;
pub mod document;
pub mod errors;
pub mod forms;
pub mod middleware;
pub mod modals;
pub mod pet;
pub mod routes;
pub mod server;
pub mod session;
pub mod state;
pub mod templates;
pub mod utils;

use crate::{
    backend::{self, supabase::SupabaseClient, unconfigured::UnconfiguredBackend},
    config, models,
};
use csrf::AesGcmCsrfProtection;

pub struct AppState {
    pub csrf_protec: AesGcmCsrfProtection,
    pub app_config: config::AppConfig,
    pub runtime_config: config::RuntimeConfig,
}

impl AppState {
    /// Backend client for one request, carrying the session restored from
    /// the identity cookie
    pub fn backend_for(&self, session: Option<models::user::AuthSession>) -> backend::ImplBackend {
        match self.runtime_config.credentials() {
            Some((url, anon_key)) => Box::new(SupabaseClient::new(url, anon_key, session)),
            None => Box::new(UnconfiguredBackend),
        }
    }

    pub fn controller<'a>(
        &self,
        backend: &'a backend::ImplBackend,
        cookie: &ntex_session::Session,
        request_headers: &ntex::http::HeaderMap,
    ) -> controller::Controller<'a> {
        let mut state = session::restore_client_state(cookie, self.app_config.default_locale());
        let tz = utils::resolve_timezone(request_headers, &mut state);

        controller::Controller::new(backend, state, tz)
    }
}
