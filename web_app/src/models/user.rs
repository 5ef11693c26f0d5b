use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

/// Identity owned by the auth provider, only the fields the app reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    pub fn display_name(&self) -> &str {
        self.user_metadata
            .name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_default()
    }
}

/// Tokens issued by a password sign-in, kept between requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl AuthSession {
    /// Whether the access token has run out at `now`; sessions without an
    /// expiry never do
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now.timestamp())
    }
}

/// Outcome of sign-up and sign-in: a sign-up waiting for email confirmation
/// returns a user without session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthResponse {
    pub user: Option<User>,
    pub session: Option<AuthSession>,
}
