//! # Backend client
//!
//! Capability traits over the hosted backend: an identity API ([`AuthApi`])
//! and a row-oriented query API ([`QueryApi`]). The facades in `api` only see
//! [`ImplBackend`], so the HTTP client can be swapped for a fake in tests or
//! for [`unconfigured::UnconfiguredBackend`] when no credentials exist.

pub mod supabase;
pub mod unconfigured;

#[cfg(test)]
pub mod memory;

use crate::models;
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde_json::Value;

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum BackendError {
    #[display("Supabase not configured")]
    NotConfigured,
    #[display("Auth session missing!")]
    SessionMissing,
    #[display("transport error: {_0}")]
    Transport(#[error(not(source))] String),
    #[display("{message}")]
    Api { status: u16, message: String },
    #[display("unexpected response: {_0}")]
    Decode(#[error(not(source))] String),
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    #[display("pets")]
    Pets,
    #[display("mood_logs")]
    MoodLogs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Gte,
    Lt,
}

impl FilterOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Gte => "gte",
            FilterOp::Lt => "lt",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: &'static str,
    pub ascending: bool,
}

/// Filters, ordering and limit applied to one table
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: Table,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: Table) -> Self {
        Self {
            table,
            filters: vec![],
            order: None,
            limit: None,
        }
    }

    fn filter(mut self, column: &'static str, op: FilterOp, value: impl ToString) -> Self {
        self.filters.push(Filter {
            column,
            op,
            value: value.to_string(),
        });
        self
    }

    pub fn eq(self, column: &'static str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Eq, value)
    }

    pub fn gte(self, column: &'static str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Gte, value)
    }

    pub fn lt(self, column: &'static str, value: impl ToString) -> Self {
        self.filter(column, FilterOp::Lt, value)
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            ascending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Value of the first equality filter on `column`
    pub fn eq_value(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.column == column && f.op == FilterOp::Eq)
            .map(|f| f.value.as_str())
    }
}

#[async_trait]
pub trait AuthApi {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<models::user::AuthResponse, BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<models::user::AuthResponse, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// User of the current session, [`BackendError::SessionMissing`] without one
    async fn get_user(&self) -> Result<models::user::User, BackendError>;

    /// Trades the refresh token for a new session, which replaces the held one
    async fn refresh_session(&self) -> Result<models::user::AuthSession, BackendError>;

    /// Session held by the client, to be persisted between requests
    fn session(&self) -> Option<models::user::AuthSession>;
}

#[async_trait]
pub trait QueryApi {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;

    /// Inserts one row and returns it as stored
    async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError>;

    /// Updates the single row matched by `query` and returns it as stored
    async fn update(&self, query: &Query, patch: Value) -> Result<Value, BackendError>;

    async fn delete(&self, query: &Query) -> Result<(), BackendError>;
}

pub trait Backend: AuthApi + QueryApi + Send + Sync {}

impl<T: AuthApi + QueryApi + Send + Sync> Backend for T {}

pub type ImplBackend = Box<dyn Backend>;

#[cfg(test)]
mockall::mock! {
    pub Client {}

    #[async_trait]
    impl AuthApi for Client {
        async fn sign_up(
            &self,
            email: &str,
            password: &str,
            name: &str,
        ) -> Result<models::user::AuthResponse, BackendError>;

        async fn sign_in_with_password(
            &self,
            email: &str,
            password: &str,
        ) -> Result<models::user::AuthResponse, BackendError>;

        async fn sign_out(&self) -> Result<(), BackendError>;

        async fn get_user(&self) -> Result<models::user::User, BackendError>;

        async fn refresh_session(&self) -> Result<models::user::AuthSession, BackendError>;

        fn session(&self) -> Option<models::user::AuthSession>;
    }

    #[async_trait]
    impl QueryApi for Client {
        async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError>;

        async fn insert(&self, table: Table, row: Value) -> Result<Value, BackendError>;

        async fn update(&self, query: &Query, patch: Value) -> Result<Value, BackendError>;

        async fn delete(&self, query: &Query) -> Result<(), BackendError>;
    }
}
