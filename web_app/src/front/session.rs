//! Cookie persistence between requests: [`ClientState`] and the language in
//! the private session cookie, the auth session in the identity cookie.

use super::{errors, state::ClientState};
use crate::{consts, i18n::Locale, models};
use ntex_identity::Identity;

/// State of the previous request, a fresh one when the cookie is missing or
/// unreadable
pub fn restore_client_state(cookie: &ntex_session::Session, default_locale: Locale) -> ClientState {
    let mut state = match cookie.get::<ClientState>(consts::CLIENT_STATE_SESSION_KEY) {
        Ok(state) => state.unwrap_or_default(),
        Err(e) => {
            log::warn!("client state dropped: {e}");
            ClientState::default()
        }
    };

    state.locale = cookie
        .get::<String>(consts::LANGUAGE_SESSION_KEY)
        .ok()
        .flatten()
        .and_then(|language| Locale::parse(&language))
        .unwrap_or(default_locale);

    state
}

pub fn persist_client_state(
    cookie: &ntex_session::Session,
    state: &ClientState,
) -> Result<(), errors::ServerError> {
    cookie
        .set(consts::CLIENT_STATE_SESSION_KEY, state)
        .and_then(|_| cookie.set(consts::LANGUAGE_SESSION_KEY, state.locale.as_str()))
        .map_err(|e| {
            errors::ServerError::InternalServerError(format!("cant set session cookie: {e}"))
        })
}

/// Auth session stored as json in the identity cookie
pub fn restore_auth_session(identity: &Identity) -> Option<models::user::AuthSession> {
    identity
        .identity()
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

pub fn persist_auth_session(identity: &Identity, session: Option<models::user::AuthSession>) {
    match session.and_then(|session| serde_json::to_string(&session).ok()) {
        Some(raw) => identity.remember(raw),
        None => identity.forget(),
    }
}
