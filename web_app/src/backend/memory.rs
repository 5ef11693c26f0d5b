//! In-memory backend used by scenario tests: accounts, a session and rows per
//! table, with the filter semantics of the row API.

use super::{AuthApi, BackendError, Filter, FilterOp, Query, QueryApi, Table};
use crate::models;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use serde_json::{Value, json};
use std::{cmp::Ordering, collections::HashMap, sync::Mutex};
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryBackend {
    accounts: Mutex<Vec<(models::user::User, String)>>,
    rows: Mutex<HashMap<Table, Vec<Value>>>,
    session: Mutex<Option<models::user::AuthSession>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored in `table`, regardless of owner
    pub fn row_count(&self, table: Table) -> usize {
        self.rows
            .lock()
            .map(|rows| rows.get(&table).map_or(0, Vec::len))
            .unwrap_or_default()
    }

    fn open_session(&self, user: &models::user::User) -> models::user::AuthSession {
        let session = models::user::AuthSession {
            access_token: Uuid::new_v4().to_string(),
            refresh_token: Uuid::new_v4().to_string(),
            expires_at: None,
            user: user.clone(),
        };
        *self.session.lock().unwrap() = Some(session.clone());
        session
    }

    fn require_session(&self) -> Result<(), BackendError> {
        match *self.session.lock().unwrap() {
            Some(_) => Ok(()),
            None => Err(BackendError::Api {
                status: 401,
                message: "JWT expired".to_string(),
            }),
        }
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare(left: &str, right: &str) -> Ordering {
    match (
        DateTime::<FixedOffset>::parse_from_rfc3339(left),
        DateTime::<FixedOffset>::parse_from_rfc3339(right),
    ) {
        (Ok(l), Ok(r)) => l.cmp(&r),
        _ => left.cmp(right),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let Some(field) = row.get(filter.column) else {
        return false;
    };
    let field = as_text(field);

    match filter.op {
        FilterOp::Eq => field == filter.value,
        FilterOp::Gte => compare(&field, &filter.value) != Ordering::Less,
        FilterOp::Lt => compare(&field, &filter.value) == Ordering::Less,
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        let user = {
            let mut accounts = self.accounts.lock().unwrap();
            if accounts
                .iter()
                .any(|(user, _)| user.email.as_deref() == Some(email))
            {
                return Err(BackendError::Api {
                    status: 422,
                    message: "User already registered".to_string(),
                });
            }

            let user = models::user::User {
                id: Uuid::new_v4(),
                email: Some(email.to_string()),
                user_metadata: models::user::UserMetadata {
                    name: Some(name.to_string()),
                },
            };
            accounts.push((user.clone(), password.to_string()));
            user
        };

        let session = self.open_session(&user);
        Ok(models::user::AuthResponse {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<models::user::AuthResponse, BackendError> {
        let user = self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(user, pwd)| user.email.as_deref() == Some(email) && pwd == password)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| BackendError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })?;

        let session = self.open_session(&user);
        Ok(models::user::AuthResponse {
            user: Some(user),
            session: Some(session),
        })
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }

    async fn get_user(&self) -> Result<models::user::User, BackendError> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.user.clone())
            .ok_or(BackendError::SessionMissing)
    }

    async fn refresh_session(&self) -> Result<models::user::AuthSession, BackendError> {
        let mut session = self.session.lock().unwrap();
        let current = session.as_mut().ok_or(BackendError::SessionMissing)?;

        current.access_token = Uuid::new_v4().to_string();
        current.refresh_token = Uuid::new_v4().to_string();
        current.expires_at = None;

        Ok(current.clone())
    }

    fn session(&self) -> Option<models::user::AuthSession> {
        self.session.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryApi for InMemoryBackend {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, BackendError> {
        self.require_session()?;

        let mut selected: Vec<Value> = self
            .rows
            .lock()
            .unwrap()
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|f| matches(row, f)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            selected.sort_by(|a, b| {
                let ordering = compare(
                    &a.get(order.column).map(as_text).unwrap_or_default(),
                    &b.get(order.column).map(as_text).unwrap_or_default(),
                );
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            selected.truncate(limit);
        }

        Ok(selected)
    }

    async fn insert(&self, table: Table, mut row: Value) -> Result<Value, BackendError> {
        self.require_session()?;

        if let Some(object) = row.as_object_mut() {
            object
                .entry("id")
                .or_insert_with(|| json!(Uuid::new_v4()));
        }

        self.rows
            .lock()
            .unwrap()
            .entry(table)
            .or_default()
            .push(row.clone());

        Ok(row)
    }

    async fn update(&self, query: &Query, patch: Value) -> Result<Value, BackendError> {
        self.require_session()?;

        let mut rows = self.rows.lock().unwrap();
        let matched: Vec<&mut Value> = rows
            .entry(query.table)
            .or_default()
            .iter_mut()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();

        let [row] = <[&mut Value; 1]>::try_from(matched).map_err(|_| BackendError::Api {
            status: 406,
            message: "JSON object requested, multiple (or no) rows returned".to_string(),
        })?;

        if let (Some(target), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }

        Ok(row.clone())
    }

    async fn delete(&self, query: &Query) -> Result<(), BackendError> {
        self.require_session()?;

        self.rows
            .lock()
            .unwrap()
            .entry(query.table)
            .or_default()
            .retain(|row| !query.filters.iter().all(|f| matches(row, f)));

        Ok(())
    }
}
