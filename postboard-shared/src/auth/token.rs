/// Opaque access tokens
///
/// [`AccessTokens`] is the token capability handed to the auth service:
/// `issue`, `resolve` and `revoke_all`, layered over a [`TokenStore`].
///
/// # Format
///
/// Plaintext tokens look like `42|AbCd...` (row id, a pipe, then 40 random
/// alphanumeric characters). Only the SHA-256 hex digest of the random part
/// is stored, so a leaked database row cannot be replayed as a token.
///
/// # Example
///
/// ```
/// use postboard_shared::auth::token::{generate_secret, hash_secret, parse_token};
///
/// let secret = generate_secret();
/// assert_eq!(secret.len(), 40);
/// assert_eq!(hash_secret(&secret).len(), 64);
///
/// let plaintext = format!("7|{}", secret);
/// assert_eq!(parse_token(&plaintext), Some((7, secret.as_str())));
/// ```

use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};

use crate::models::access_token::{AccessToken, NewAccessToken};
use crate::store::{StoreResult, TokenStore};

/// Length of the random part of a token (characters)
pub const SECRET_LENGTH: usize = 40;

/// Name given to tokens issued at login and registration
pub const DEFAULT_TOKEN_NAME: &str = "auth_token";

/// Generates the random part of a token
pub fn generate_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect()
}

/// Hashes a token secret using SHA-256, hex encoded (64 characters)
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Splits a plaintext token into its row id and secret
///
/// Returns `None` when the token is not of the form `{id}|{secret}` with a
/// numeric id and a non-empty secret.
pub fn parse_token(token: &str) -> Option<(i64, &str)> {
    let (id, secret) = token.split_once('|')?;
    let id = id.parse::<i64>().ok()?;
    if secret.is_empty() {
        return None;
    }
    Some((id, secret))
}

/// Compares two strings in constant time (for equal lengths)
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// A freshly issued token
///
/// `plaintext` is the only copy of the secret; it is never recoverable later.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub plaintext: String,
    pub token: AccessToken,
}

/// Token capability over a [`TokenStore`]
#[derive(Clone)]
pub struct AccessTokens {
    store: Arc<dyn TokenStore>,
}

impl AccessTokens {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Issues a new token for `user_id`. Existing tokens stay valid.
    pub async fn issue(&self, user_id: i64, name: &str) -> StoreResult<IssuedToken> {
        let secret = generate_secret();
        let token = self
            .store
            .create(NewAccessToken {
                user_id,
                name: name.to_string(),
                token_hash: hash_secret(&secret),
            })
            .await?;

        Ok(IssuedToken {
            plaintext: format!("{}|{}", token.id, secret),
            token,
        })
    }

    /// Resolves a plaintext token to its stored row
    ///
    /// Returns `Ok(None)` for malformed, unknown or revoked tokens. A
    /// successful resolution stamps `last_used_at`.
    pub async fn resolve(&self, plaintext: &str) -> StoreResult<Option<AccessToken>> {
        let Some((id, secret)) = parse_token(plaintext) else {
            return Ok(None);
        };

        let Some(token) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        if !constant_time_compare(&hash_secret(secret), &token.token_hash) {
            return Ok(None);
        }

        self.store.touch(token.id).await?;
        Ok(Some(token))
    }

    /// Revokes every token belonging to `user_id`
    pub async fn revoke_all(&self, user_id: i64) -> StoreResult<u64> {
        self.store.delete_for_user(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryTokenStore;

    #[test]
    fn test_generate_secret() {
        let a = generate_secret();
        let b = generate_secret();

        assert_eq!(a.len(), SECRET_LENGTH);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hash_secret_is_deterministic() {
        let hash = hash_secret("secret");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_secret("secret"));
        assert_ne!(hash, hash_secret("other"));
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token("12|abc"), Some((12, "abc")));
        assert_eq!(parse_token("12|a|b"), Some((12, "a|b")));
        assert_eq!(parse_token("abc"), None);
        assert_eq!(parse_token("x|abc"), None);
        assert_eq!(parse_token("12|"), None);
        assert_eq!(parse_token(""), None);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcd"));
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let tokens = AccessTokens::new(Arc::new(MemoryTokenStore::default()));

        let issued = tokens.issue(3, DEFAULT_TOKEN_NAME).await.unwrap();
        assert!(issued.plaintext.starts_with(&format!("{}|", issued.token.id)));

        let resolved = tokens.resolve(&issued.plaintext).await.unwrap().unwrap();
        assert_eq!(resolved.user_id, 3);
        assert_eq!(resolved.name, DEFAULT_TOKEN_NAME);
    }

    #[tokio::test]
    async fn test_resolve_rejects_wrong_secret() {
        let tokens = AccessTokens::new(Arc::new(MemoryTokenStore::default()));
        let issued = tokens.issue(3, DEFAULT_TOKEN_NAME).await.unwrap();

        let forged = format!("{}|{}", issued.token.id, generate_secret());
        assert!(tokens.resolve(&forged).await.unwrap().is_none());
        assert!(tokens.resolve("not-a-token").await.unwrap().is_none());
        assert!(tokens.resolve("999|whatever").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_revoke_all_invalidates_every_token() {
        let tokens = AccessTokens::new(Arc::new(MemoryTokenStore::default()));
        let first = tokens.issue(3, DEFAULT_TOKEN_NAME).await.unwrap();
        let second = tokens.issue(3, DEFAULT_TOKEN_NAME).await.unwrap();
        let other = tokens.issue(4, DEFAULT_TOKEN_NAME).await.unwrap();

        assert_eq!(tokens.revoke_all(3).await.unwrap(), 2);
        assert!(tokens.resolve(&first.plaintext).await.unwrap().is_none());
        assert!(tokens.resolve(&second.plaintext).await.unwrap().is_none());
        assert!(tokens.resolve(&other.plaintext).await.unwrap().is_some());

        assert_eq!(tokens.revoke_all(3).await.unwrap(), 0);
    }
}
