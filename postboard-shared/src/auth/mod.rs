/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing behind the `CredentialHasher` trait
/// - [`token`]: Opaque bearer tokens, SHA-256 hashed at rest
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use postboard_shared::auth::token::AccessTokens;
/// use postboard_shared::store::memory::MemoryTokenStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = AccessTokens::new(Arc::new(MemoryTokenStore::default()));
/// let issued = tokens.issue(1, "auth_token").await?;
/// assert!(tokens.resolve(&issued.plaintext).await?.is_some());
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod token;
