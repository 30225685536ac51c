/// Access token model
///
/// Tokens are opaque bearer credentials. The plaintext form
/// (`"{id}|{secret}"`) is returned exactly once, when the token is issued;
/// only the SHA-256 hash of the secret is persisted.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE personal_access_tokens (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL,
///     name VARCHAR(255) NOT NULL,
///     token_hash VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_used_at TIMESTAMPTZ
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted access token row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessToken {
    /// Unique token ID (also the prefix of the plaintext token)
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Token name, e.g. "auth_token"
    pub name: String,

    /// SHA-256 hex digest of the secret
    #[serde(skip_serializing, default)]
    pub token_hash: String,

    /// When the token was issued
    pub created_at: DateTime<Utc>,

    /// When the token last authenticated a request
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Input for persisting a new token
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub user_id: i64,
    pub name: String,
    pub token_hash: String,
}
