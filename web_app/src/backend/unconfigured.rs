use super::{AuthApi, BackendError, Query, QueryApi, Table};
use crate::models;
use async_trait::async_trait;
use serde_json::Value;

/// Stand-in used when the runtime config carries no usable service URL or
/// key. Every call fails with [`BackendError::NotConfigured`] so the app still
/// renders and reports the problem instead of refusing to start.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredBackend;

#[async_trait]
impl AuthApi for UnconfiguredBackend {
    async fn sign_up(
        &self,
        _email: &str,
        _password: &str,
        _name: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn get_user(&self) -> Result<models::user::User, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn refresh_session(&self) -> Result<models::user::AuthSession, BackendError> {
        Err(BackendError::NotConfigured)
    }

    fn session(&self) -> Option<models::user::AuthSession> {
        None
    }
}

#[async_trait]
impl QueryApi for UnconfiguredBackend {
    async fn select(&self, _query: &Query) -> Result<Vec<Value>, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn insert(&self, _table: Table, _row: Value) -> Result<Value, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn update(&self, _query: &Query, _patch: Value) -> Result<Value, BackendError> {
        Err(BackendError::NotConfigured)
    }

    async fn delete(&self, _query: &Query) -> Result<(), BackendError> {
        Err(BackendError::NotConfigured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ntex::test]
    async fn test_every_call_reports_not_configured() {
        let backend = UnconfiguredBackend;

        assert_eq!(
            backend.sign_in_with_password("a@b.com", "password1").await,
            Err(BackendError::NotConfigured)
        );
        assert_eq!(
            backend.select(&Query::from(Table::Pets)).await,
            Err(BackendError::NotConfigured)
        );
        assert!(backend.session().is_none());
    }
}
