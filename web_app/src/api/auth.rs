//! # Auth API Module
//!
//! Sign-up, password sign-in, sign-out and the signed-in user, delegated to
//! the identity provider behind [`backend::AuthApi`].

use super::ApiError;
use crate::{backend, i18n::TrKey, metric, models};
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const MIN_PASSWORD_LEN: usize = 8;

/// Shape check of an email address, the provider does the real validation
pub fn validate_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
}

/// Registers a new account.
///
/// # Arguments
/// * `backend` - Backend client, keeps the new session when the provider
///   confirms the account right away
/// * `email` - Account email
/// * `password` - Plain password, sent over TLS to the provider only
/// * `name` - Display name stored as user metadata
///
/// # Returns
/// * `Result<models::user::AuthResponse, ApiError>` - The new user, with a
///   session unless email confirmation is pending
pub async fn sign_up(
    backend: &backend::ImplBackend,
    email: &str,
    password: &str,
    name: &str,
) -> Result<models::user::AuthResponse, ApiError> {
    let _span = logfire::span!("sign_up").entered();

    if email.trim().is_empty() {
        return Err(ApiError::Validation(TrKey::EmailRequired));
    }
    if password.is_empty() {
        return Err(ApiError::Validation(TrKey::PasswordRequired));
    }

    let response = backend
        .sign_up(email.trim(), password, name.trim())
        .await
        .map_err(|e| ApiError::from_backend("signing up", e))?;

    metric::incr_user_action_statds("sign_up");
    Ok(response)
}

/// Password sign-in; on success the backend holds the new session.
pub async fn sign_in(
    backend: &backend::ImplBackend,
    email: &str,
    password: &str,
) -> Result<models::user::AuthResponse, ApiError> {
    let _span = logfire::span!("sign_in").entered();

    if email.trim().is_empty() {
        return Err(ApiError::Validation(TrKey::EmailRequired));
    }
    if password.is_empty() {
        return Err(ApiError::Validation(TrKey::PasswordRequired));
    }

    backend
        .sign_in_with_password(email.trim(), password)
        .await
        .map_err(|e| ApiError::from_backend("signing in", e))
}

pub async fn sign_out(backend: &backend::ImplBackend) -> Result<(), ApiError> {
    let _span = logfire::span!("sign_out").entered();

    backend
        .sign_out()
        .await
        .map_err(|e| ApiError::from_backend("signing out", e))
}

/// Trades the refresh token for a new session, held by the backend and
/// persisted with the response. Failures are logged.
async fn refresh_session(backend: &backend::ImplBackend) -> bool {
    match backend.refresh_session().await {
        Ok(_) => {
            logfire::debug!("session refreshed");
            true
        }
        Err(e) => {
            logfire::warn!("session refresh failed: {error}", error = e.to_string());
            false
        }
    }
}

/// Signed-in user, if any.
///
/// An expired access token is refreshed before the lookup; a token the
/// provider rejects is refreshed once and the lookup retried. A missing
/// session is the normal signed-out state and is not logged; any other
/// failure is logged and also yields `None`.
pub async fn get_current_user(backend: &backend::ImplBackend) -> Option<models::user::User> {
    let expired = backend
        .session()
        .is_some_and(|session| session.is_expired(Utc::now()));
    if expired {
        refresh_session(backend).await;
    }

    let mut result = backend.get_user().await;
    if !expired
        && matches!(result, Err(backend::BackendError::Api { status: 401, .. }))
        && refresh_session(backend).await
    {
        result = backend.get_user().await;
    }

    match result {
        Ok(user) => Some(user),
        Err(backend::BackendError::SessionMissing) => None,
        Err(e) => {
            logfire::warn!("get_current_user failed: {error}", error = e.to_string());
            None
        }
    }
}

pub async fn check_auth(backend: &backend::ImplBackend) -> bool {
    get_current_user(backend).await.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::test_support,
        backend::{BackendError, MockClient, memory::InMemoryBackend},
    };

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("first.last@example.co.uk"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a b@c.com"));
        assert!(!validate_email("@b.com"));
        assert!(!validate_email(""));
    }

    #[test]
    fn test_validate_password_counts_characters() {
        assert!(validate_password("password1"));
        assert!(validate_password("àèìòùàèì"));
        assert!(!validate_password("short"));
    }

    #[ntex::test]
    async fn test_sign_up_then_sign_in_yields_current_user() {
        let backend: backend::ImplBackend = Box::new(InMemoryBackend::new());

        let signed_up = sign_up(&backend, "a@b.com", "password1", "Rex").await;
        assert!(signed_up.is_ok_and(|r| r.user.is_some()));

        sign_out(&backend).await.unwrap();
        assert!(get_current_user(&backend).await.is_none());

        let signed_in = sign_in(&backend, "a@b.com", "password1").await.unwrap();
        assert!(signed_in.session.is_some());

        let user = get_current_user(&backend).await;
        assert!(user.is_some_and(|u| u.display_name() == "Rex"));
        assert!(check_auth(&backend).await);
    }

    #[ntex::test]
    async fn test_sign_in_wrong_password_passes_provider_message() {
        let backend: backend::ImplBackend = Box::new(InMemoryBackend::new());
        sign_up(&backend, "a@b.com", "password1", "Rex").await.unwrap();

        let result = sign_in(&backend, "a@b.com", "password2").await;

        assert_eq!(
            result,
            Err(ApiError::Backend("Invalid login credentials".to_string()))
        );
    }

    #[ntex::test]
    async fn test_sign_in_requires_email_before_any_call() {
        let mut mock = MockClient::new();
        mock.expect_sign_in_with_password().never();
        let backend: backend::ImplBackend = Box::new(mock);

        let result = sign_in(&backend, "  ", "password1").await;

        assert_eq!(result, Err(ApiError::Validation(TrKey::EmailRequired)));
    }

    #[ntex::test]
    async fn test_get_current_user_swallows_failures() {
        let backend: backend::ImplBackend = Box::new(test_support::signed_out_mock());
        assert!(get_current_user(&backend).await.is_none());

        let mut mock = MockClient::new();
        mock.expect_session()
            .returning(|| Some(test_support::session()));
        mock.expect_get_user()
            .times(1)
            .returning(|| Err(BackendError::Transport("connection refused".into())));
        mock.expect_refresh_session().never();
        let backend: backend::ImplBackend = Box::new(mock);
        assert!(get_current_user(&backend).await.is_none());
    }

    #[ntex::test]
    async fn test_expired_session_is_refreshed_before_lookup() {
        let mut mock = MockClient::new();
        mock.expect_session().returning(|| {
            Some(models::user::AuthSession {
                expires_at: Some(Utc::now().timestamp() - 60),
                ..test_support::session()
            })
        });
        mock.expect_refresh_session()
            .times(1)
            .returning(|| Ok(test_support::session()));
        mock.expect_get_user()
            .times(1)
            .returning(|| Ok(test_support::user()));
        let backend: backend::ImplBackend = Box::new(mock);

        assert_eq!(get_current_user(&backend).await, Some(test_support::user()));
    }

    #[ntex::test]
    async fn test_rejected_token_is_refreshed_and_lookup_retried() {
        let mut mock = MockClient::new();
        mock.expect_session()
            .returning(|| Some(test_support::session()));
        let mut calls = 0;
        mock.expect_get_user().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Err(BackendError::Api {
                    status: 401,
                    message: "JWT expired".into(),
                })
            } else {
                Ok(test_support::user())
            }
        });
        mock.expect_refresh_session()
            .times(1)
            .returning(|| Ok(test_support::session()));
        let backend: backend::ImplBackend = Box::new(mock);

        assert!(check_auth(&backend).await);
    }

    #[ntex::test]
    async fn test_refresh_keeps_user_signed_in_with_new_tokens() {
        let backend: backend::ImplBackend = Box::new(InMemoryBackend::new());
        sign_up(&backend, "a@b.com", "password1", "Rex").await.unwrap();
        let before = backend.session().unwrap();

        let after = backend.refresh_session().await.unwrap();

        assert_ne!(after.access_token, before.access_token);
        assert_eq!(backend.session(), Some(after));
        assert!(get_current_user(&backend).await.is_some());
    }

    #[ntex::test]
    async fn test_sign_up_network_failure_is_generic() {
        let mut mock = MockClient::new();
        mock.expect_sign_up()
            .times(1)
            .returning(|_, _, _| Err(BackendError::Transport("dns".into())));
        let backend: backend::ImplBackend = Box::new(mock);

        let result = sign_up(&backend, "a@b.com", "password1", "Rex").await;

        assert_eq!(
            result,
            Err(ApiError::Network(
                "Network error occurred while signing up".to_string()
            ))
        );
    }
}
