//! # API Module
//!
//! Facades over the backend client. Every operation returns
//! `Result<T, ApiError>`: failures are logged where they happen and handed
//! back to the caller, never raised.
//!
//! ## Modules
//!
//! - [`auth`] - Sign-up, sign-in, sign-out and the current user
//! - [`mood`] - Mood logging and history
//! - [`pet`] - Pet management scoped to the current user

pub mod auth;
pub mod mood;
pub mod pet;

use crate::{
    backend::{self, BackendError},
    i18n::{self, Locale, TrKey},
    models,
};
use derive_more::{Display, Error};
use serde::de::DeserializeOwned;

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum ApiError {
    #[display("not authenticated")]
    Unauthenticated,
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] TrKey),
    #[display("{_0}")]
    Network(#[error(not(source))] String),
    #[display("{_0}")]
    Backend(#[error(not(source))] String),
    #[display("Supabase not configured")]
    NotConfigured,
}

impl ApiError {
    /// Maps a backend failure of `operation` (e.g. "fetching pets"), logging
    /// the underlying cause
    pub fn from_backend(operation: &str, err: BackendError) -> Self {
        logfire::error!(
            "{operation} failed: {error}",
            operation = operation.to_string(),
            error = err.to_string()
        );

        match err {
            BackendError::NotConfigured => ApiError::NotConfigured,
            BackendError::SessionMissing => ApiError::Unauthenticated,
            BackendError::Transport(_) => {
                ApiError::Network(format!("Network error occurred while {operation}"))
            }
            BackendError::Api { message, .. } => ApiError::Backend(message),
            BackendError::Decode(detail) => ApiError::Backend(detail),
        }
    }

    /// Text shown to the user in `locale`
    pub fn user_message(&self, locale: Locale) -> String {
        match self {
            ApiError::Unauthenticated => i18n::t(locale, TrKey::NotAuthenticated, &[]),
            ApiError::Validation(key) => i18n::t(locale, *key, &[]),
            ApiError::Network(_) => i18n::t(locale, TrKey::NetworkError, &[]),
            ApiError::Backend(message) => message.clone(),
            ApiError::NotConfigured => i18n::t(locale, TrKey::NotConfigured, &[]),
        }
    }
}

/// Resolves the signed-in user; fails with [`ApiError::Unauthenticated`]
/// before any row is touched
async fn require_user(backend: &backend::ImplBackend) -> Result<models::user::User, ApiError> {
    auth::get_current_user(backend)
        .await
        .ok_or(ApiError::Unauthenticated)
}

fn parse_row<T: DeserializeOwned>(row: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(row)
        .map_err(|e| ApiError::from_backend("decoding a row", BackendError::Decode(e.to_string())))
}

fn parse_rows<T: DeserializeOwned>(rows: Vec<serde_json::Value>) -> Result<Vec<T>, ApiError> {
    rows.into_iter().map(parse_row).collect()
}

fn to_row<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value)
        .map_err(|e| ApiError::from_backend("encoding a row", BackendError::Decode(e.to_string())))
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{backend, models};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    pub fn user() -> models::user::User {
        models::user::User {
            id: Uuid::parse_str("7b1a5a6e-2b7c-4d1e-9f7a-1c2d3e4f5a6b").unwrap(),
            email: Some("a@b.com".to_string()),
            user_metadata: models::user::UserMetadata {
                name: Some("Rex".to_string()),
            },
        }
    }

    pub fn session() -> models::user::AuthSession {
        models::user::AuthSession {
            access_token: "token-a".to_string(),
            refresh_token: "token-r".to_string(),
            expires_at: None,
            user: user(),
        }
    }

    pub fn pet(name: &str) -> models::pet::Pet {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        models::pet::Pet {
            id: Uuid::new_v4(),
            user_id: user().id,
            name: name.to_string(),
            species: models::pet::Species::Dog,
            breed: None,
            birth_date: None,
            weight: None,
            notes: None,
            avatar_url: None,
            created_at: at,
            updated_at: at,
        }
    }

    /// Mock with a signed-in user and no other expectation
    pub fn signed_in_mock() -> backend::MockClient {
        let mut mock = backend::MockClient::new();
        mock.expect_get_user().returning(|| Ok(user()));
        mock.expect_session().returning(|| Some(session()));
        mock
    }

    /// Mock without session: any row access fails the test
    pub fn signed_out_mock() -> backend::MockClient {
        let mut mock = backend::MockClient::new();
        mock.expect_get_user()
            .returning(|| Err(backend::BackendError::SessionMissing));
        mock.expect_session().returning(|| None);
        mock.expect_select().never();
        mock.expect_insert().never();
        mock.expect_update().never();
        mock.expect_delete().never();
        mock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_errors_map_to_user_facing_kinds() {
        assert_eq!(
            ApiError::from_backend("fetching pets", BackendError::Transport("refused".into())),
            ApiError::Network("Network error occurred while fetching pets".to_string())
        );
        assert_eq!(
            ApiError::from_backend("fetching pets", BackendError::SessionMissing),
            ApiError::Unauthenticated
        );
        assert_eq!(
            ApiError::from_backend(
                "creating pet",
                BackendError::Api {
                    status: 409,
                    message: "duplicate key".into()
                }
            ),
            ApiError::Backend("duplicate key".to_string())
        );
    }

    #[test]
    fn test_user_message_is_localized() {
        assert_eq!(
            ApiError::Validation(TrKey::PetNameRequired).user_message(Locale::It),
            "Nome dell'animale richiesto"
        );
        assert_eq!(
            ApiError::Network("detail".into()).user_message(Locale::En),
            "Network error. Please try again."
        );
        assert_eq!(
            ApiError::Backend("Invalid login credentials".into()).user_message(Locale::It),
            "Invalid login credentials"
        );
    }
}
