/// Authentication service
///
/// Registration, login, logout and token-to-user resolution. Password
/// hashing and token handling are injected capabilities
/// ([`CredentialHasher`], [`AccessTokens`]); users are read and written
/// through a [`UserStore`].
///
/// Logging in never invalidates earlier tokens, so a user may hold several
/// concurrent sessions. Logging out revokes all of them at once.

use std::sync::Arc;

use anyhow::anyhow;
use tracing::{debug, error, info};

use crate::auth::password::CredentialHasher;
use crate::auth::token::{AccessTokens, DEFAULT_TOKEN_NAME};
use crate::error::{ServiceError, ServiceResult};
use crate::models::access_token::AccessToken;
use crate::models::user::{NewUser, User};
use crate::store::UserStore;
use crate::validation::FieldErrors;

/// Validated registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Validated login input
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Result of a successful registration or login
#[derive(Debug, Clone)]
pub struct Authenticated {
    /// Plaintext bearer token, shown once
    pub token: String,

    pub user: User,
}

/// A resolved bearer token and the user it belongs to
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: AccessToken,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: AccessTokens,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: AccessTokens,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }

    /// Creates an account and issues its first token
    ///
    /// # Errors
    ///
    /// - `ServiceError::Validation` with an `email` entry if the address is taken
    /// - `ServiceError::Unexpected` on store or hashing failures
    pub async fn register(&self, input: Registration) -> ServiceResult<Authenticated> {
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(ServiceError::Validation(FieldErrors::single(
                "email",
                "The email has already been taken.",
            )));
        }

        let password_hash = self.hash_password(input.password).await?;

        // A concurrent registration can still win the race; the store's
        // unique constraint surfaces as the same field error.
        let user = self
            .users
            .create(NewUser {
                name: input.name,
                email: input.email,
                password_hash,
            })
            .await?;

        let issued = self.tokens.issue(user.id, DEFAULT_TOKEN_NAME).await?;
        info!(user_id = user.id, token_id = issued.token.id, "User registered");

        Ok(Authenticated {
            token: issued.plaintext,
            user,
        })
    }

    /// Checks credentials and issues a fresh token
    ///
    /// # Errors
    ///
    /// `ServiceError::InvalidCredentials` for an unknown email or a wrong
    /// password alike.
    pub async fn login(&self, input: Credentials) -> ServiceResult<Authenticated> {
        let Some(user) = self.users.find_by_email(&input.email).await? else {
            debug!("Login attempt for unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self
            .verify_password(input.password, user.password_hash.clone())
            .await?
        {
            debug!(user_id = user.id, "Login attempt with wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let issued = self.tokens.issue(user.id, DEFAULT_TOKEN_NAME).await?;
        info!(user_id = user.id, token_id = issued.token.id, "User logged in");

        Ok(Authenticated {
            token: issued.plaintext,
            user,
        })
    }

    /// Argon2 is CPU-bound, so hashing runs on the blocking pool
    async fn hash_password(&self, password: String) -> ServiceResult<String> {
        let hasher = Arc::clone(&self.hasher);
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| {
                error!(error = %e, "Password hashing task failed");
                anyhow!("password hashing task failed: {e}")
            })??;

        Ok(hash)
    }

    async fn verify_password(&self, password: String, hash: String) -> ServiceResult<bool> {
        let hasher = Arc::clone(&self.hasher);
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| {
                error!(error = %e, "Password verification task failed");
                anyhow!("password verification task failed: {e}")
            })??;

        Ok(matches)
    }

    /// Revokes every token of the session's user
    ///
    /// Returns the number of tokens removed. Calling it when nothing is left
    /// to revoke is not an error.
    pub async fn logout(&self, session: &Session) -> ServiceResult<u64> {
        let revoked = self.tokens.revoke_all(session.user.id).await?;
        info!(user_id = session.user.id, revoked, "User logged out");
        Ok(revoked)
    }

    /// Resolves a bearer token to its session
    ///
    /// # Errors
    ///
    /// `ServiceError::Unauthenticated` when the token is malformed, unknown,
    /// revoked, or its owner no longer exists.
    pub async fn current_user(&self, token: &str) -> ServiceResult<Session> {
        let token = self
            .tokens
            .resolve(token)
            .await?
            .ok_or(ServiceError::Unauthenticated)?;

        let user = self
            .users
            .find_by_id(token.user_id)
            .await?
            .ok_or(ServiceError::Unauthenticated)?;

        Ok(Session { user, token })
    }
}
