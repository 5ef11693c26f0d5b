//! # Supabase client
//!
//! [`AuthApi`] over the GoTrue endpoints (`/auth/v1/*`) and [`QueryApi`]
//! over PostgREST (`/rest/v1/{table}`). One client is built per request from
//! the session restored out of the identity cookie; the underlying
//! `reqwest::Client` is shared.

use super::{AuthApi, BackendError, Query, QueryApi, Table};
use crate::{models, utils};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::RwLock;

const SINGLE_ROW_MISMATCH: &str = "JSON object requested, multiple (or no) rows returned";

/// Result of the startup probe against the identity health endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Reachable,
    InvalidApiKey,
    Unreachable(String),
}

pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
    session: RwLock<Option<models::user::AuthSession>>,
}

impl SupabaseClient {
    pub fn new(
        base_url: &str,
        anon_key: &str,
        session: Option<models::user::AuthSession>,
    ) -> Self {
        Self {
            client: utils::REQUEST_CLIENT.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            session: RwLock::new(session),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    fn rest_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    fn store_session(&self, session: Option<models::user::AuthSession>) {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = session;
    }

    /// Adds `apikey` and the bearer token; the anon key stands in for the
    /// token when nobody is signed in
    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self.access_token().unwrap_or_else(|| self.anon_key.clone());
        request.header("apikey", &self.anon_key).bearer_auth(token)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, BackendError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("supabase request failed: {}", e);
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();
        let url = response.url().path().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::info!(status = status.as_u16(), url = %url, "supabase answered with an error");
            return Err(api_error(status.as_u16(), &body));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Probes `/auth/v1/health` with the configured key
    pub async fn check_connection(&self) -> ConnectionStatus {
        let request = self
            .client
            .get(self.auth_url("health"))
            .header("apikey", &self.anon_key);

        match self.send(request).await {
            Ok(_) => ConnectionStatus::Reachable,
            Err(BackendError::Api { message, .. }) if message.contains("Invalid API key") => {
                ConnectionStatus::InvalidApiKey
            }
            Err(e) => ConnectionStatus::Unreachable(e.to_string()),
        }
    }
}

/// Builds an [`BackendError::Api`] out of an error body, reading the first of
/// the message fields GoTrue and PostgREST use
fn api_error(status: u16, body: &str) -> BackendError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["msg", "message", "error_description", "error"]
                .into_iter()
                .find_map(|field| value.get(field).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("request failed with status {status}")
            } else {
                body.trim().to_string()
            }
        });

    BackendError::Api { status, message }
}

/// PostgREST query string: `col=op.value` filters, `order=col.desc`, `limit=n`
fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filters
        .iter()
        .map(|f| (f.column.to_string(), format!("{}.{}", f.op.as_str(), f.value)))
        .collect();

    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }

    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }

    params
}

/// Sign-up answers with a full session when email confirmation is off and
/// with the bare user otherwise; sign-in always answers with a session.
fn parse_auth_response(value: Value) -> Result<models::user::AuthResponse, BackendError> {
    if value.get("access_token").is_some() {
        let session: models::user::AuthSession =
            serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))?;
        return Ok(models::user::AuthResponse {
            user: Some(session.user.clone()),
            session: Some(session),
        });
    }

    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: models::user::User =
        serde_json::from_value(user_value).map_err(|e| BackendError::Decode(e.to_string()))?;

    Ok(models::user::AuthResponse {
        user: Some(user),
        session: None,
    })
}

#[async_trait]
impl AuthApi for SupabaseClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        let request = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "name": name },
            }));

        let response = parse_auth_response(self.send(request).await?)?;
        if response.session.is_some() {
            self.store_session(response.session.clone());
        }

        Ok(response)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "email": email, "password": password }));

        let response = parse_auth_response(self.send(request).await?)?;
        self.store_session(response.session.clone());

        Ok(response)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        if self.access_token().is_none() {
            return Ok(());
        }

        let request = self.authorized(self.client.post(self.auth_url("logout")));
        let result = self.send(request).await.map(|_| ());

        // the local session is dropped even when the server refuses
        self.store_session(None);

        result
    }

    async fn get_user(&self) -> Result<models::user::User, BackendError> {
        if self.access_token().is_none() {
            return Err(BackendError::SessionMissing);
        }

        let request = self.authorized(self.client.get(self.auth_url("user")));
        serde_json::from_value(self.send(request).await?)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn refresh_session(&self) -> Result<models::user::AuthSession, BackendError> {
        let refresh_token = self
            .session()
            .map(|s| s.refresh_token)
            .ok_or(BackendError::SessionMissing)?;

        let request = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }));

        let session = parse_auth_response(self.send(request).await?)?
            .session
            .ok_or_else(|| BackendError::Decode("refresh returned no session".to_string()))?;
        self.store_session(Some(session.clone()));

        Ok(session)
    }

    fn session(&self) -> Option<models::user::AuthSession> {
        self.session.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl QueryApi for SupabaseClient {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        let request = self
            .authorized(self.client.get(self.rest_url(query.table)))
            .query(&[("select", "*")])
            .query(&query_params(query));

        match self.send(request).await? {
            Value::Array(rows) => Ok(rows),
            Value::Null => Ok(vec![]),
            other => Err(BackendError::Decode(format!("expected rows, got {other}"))),
        }
    }

    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError> {
        let request = self
            .authorized(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .json(&row);

        single_row(self.send(request).await?)
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Value, BackendError> {
        let request = self
            .authorized(self.client.patch(self.rest_url(query.table)))
            .query(&query_params(query))
            .header("Prefer", "return=representation")
            .json(&patch);

        single_row(self.send(request).await?)
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        let request = self
            .authorized(self.client.delete(self.rest_url(query.table)))
            .query(&query_params(query));

        self.send(request).await.map(|_| ())
    }
}

/// Exactly one row from a `return=representation` write
fn single_row(value: Value) -> Result<Value, BackendError> {
    match value {
        Value::Array(mut rows) if rows.len() == 1 => Ok(rows.remove(0)),
        Value::Array(_) => Err(BackendError::Api {
            status: 406,
            message: SINGLE_ROW_MISMATCH.to_string(),
        }),
        Value::Object(_) => Ok(value),
        other => Err(BackendError::Decode(format!("expected a row, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session_json() -> Value {
        json!({
            "access_token": "token-a",
            "refresh_token": "token-r",
            "expires_at": 1_700_000_000,
            "token_type": "bearer",
            "user": {
                "id": "7b1a5a6e-2b7c-4d1e-9f7a-1c2d3e4f5a6b",
                "email": "a@b.com",
                "user_metadata": { "name": "Rex" }
            }
        })
    }

    #[test]
    fn test_query_params_follow_postgrest_syntax() {
        let pet_id = Uuid::new_v4();
        let query = Query::from(Table::MoodLogs)
            .eq("pet_id", pet_id)
            .gte("logged_at", "2024-05-01T00:00:00+00:00")
            .lt("logged_at", "2024-05-01T10:00:00+00:00")
            .order_desc("logged_at")
            .limit(1);

        assert_eq!(
            query_params(&query),
            vec![
                ("pet_id".to_string(), format!("eq.{pet_id}")),
                ("logged_at".to_string(), "gte.2024-05-01T00:00:00+00:00".to_string()),
                ("logged_at".to_string(), "lt.2024-05-01T10:00:00+00:00".to_string()),
                ("order".to_string(), "logged_at.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn test_api_error_reads_known_message_fields() {
        assert_eq!(
            api_error(400, r#"{"error_description":"Invalid login credentials"}"#),
            BackendError::Api {
                status: 400,
                message: "Invalid login credentials".to_string()
            }
        );
        assert_eq!(
            api_error(422, r#"{"code":422,"msg":"User already registered"}"#).to_string(),
            "User already registered"
        );
        assert_eq!(
            api_error(502, "").to_string(),
            "request failed with status 502"
        );
    }

    #[test]
    fn test_parse_auth_response_with_and_without_session() {
        let signed_in = parse_auth_response(session_json()).unwrap();
        assert_eq!(signed_in.session.unwrap().access_token, "token-a");
        assert_eq!(signed_in.user.unwrap().display_name(), "Rex");

        let pending_confirmation =
            parse_auth_response(session_json()["user"].clone()).unwrap();
        assert!(pending_confirmation.session.is_none());
        assert_eq!(
            pending_confirmation.user.unwrap().email.as_deref(),
            Some("a@b.com")
        );
    }

    #[test]
    fn test_single_row_rejects_empty_update() {
        assert_eq!(
            single_row(json!([])),
            Err(BackendError::Api {
                status: 406,
                message: SINGLE_ROW_MISMATCH.to_string()
            })
        );
        assert_eq!(single_row(json!([{"id": 1}])), Ok(json!({"id": 1})));
    }

    #[ntex::test]
    async fn test_get_user_without_session_skips_request() {
        let client = SupabaseClient::new("http://127.0.0.1:9", "anon", None);

        assert_eq!(client.get_user().await, Err(BackendError::SessionMissing));
        assert_eq!(
            client.refresh_session().await,
            Err(BackendError::SessionMissing)
        );
        assert!(client.sign_out().await.is_ok());
        assert!(client.session().is_none());
    }
}
