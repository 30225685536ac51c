/// Persistence ports
///
/// One async trait per entity type. The services only ever talk to these
/// traits; the composition root decides which adapter backs them.
///
/// # Adapters
///
/// - [`postgres`]: PostgreSQL via `sqlx` (production)
/// - [`memory`]: `RwLock`-guarded maps (tests and local experiments)
///
/// # Example
///
/// ```
/// use postboard_shared::store::{memory::MemoryPostStore, PostStore};
/// use postboard_shared::models::post::NewPost;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryPostStore::default();
/// let post = store
///     .create(NewPost {
///         user_id: None,
///         title: "Hello".to_string(),
///         content: "World".to_string(),
///     })
///     .await?;
/// assert_eq!(store.find_by_id(post.id).await?, Some(post));
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{
    access_token::{AccessToken, NewAccessToken},
    post::{NewPost, Post, UpdatePost},
    user::{NewUser, UpdateUser, User},
};

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint was violated on the named field
    #[error("Duplicate value for unique field: {field}")]
    Conflict {
        /// Field (column) the constraint covers
        field: &'static str,
    },

    /// The backend could not serve the request
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence port for users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Lists every user ordered by id.
    async fn list(&self) -> StoreResult<Vec<User>>;

    /// Fetches a user by id.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Fetches a user by exact email address.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Inserts a user. Fails with [`StoreError::Conflict`] on a duplicate email.
    async fn create(&self, data: NewUser) -> StoreResult<User>;

    /// Applies a partial update. Returns `None` when the user does not exist.
    async fn update(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>>;

    /// Deletes a user. Returns `false` when no row was affected.
    ///
    /// Tokens owned by the user are left untouched.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Persistence port for posts
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Lists every post ordered by id.
    async fn list(&self) -> StoreResult<Vec<Post>>;

    /// Fetches a post by id.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>>;

    /// Inserts a post.
    async fn create(&self, data: NewPost) -> StoreResult<Post>;

    /// Applies a partial update. Returns `None` when the post does not exist.
    async fn update(&self, id: i64, data: UpdatePost) -> StoreResult<Option<Post>>;

    /// Deletes a post. Returns `false` when no row was affected.
    async fn delete(&self, id: i64) -> StoreResult<bool>;
}

/// Persistence port for access tokens
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Inserts a token row.
    async fn create(&self, data: NewAccessToken) -> StoreResult<AccessToken>;

    /// Fetches a token row by id.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<AccessToken>>;

    /// Stamps `last_used_at` with the current time.
    async fn touch(&self, id: i64) -> StoreResult<()>;

    /// Deletes every token owned by `user_id`, returning how many were removed.
    async fn delete_for_user(&self, user_id: i64) -> StoreResult<u64>;
}

/// Liveness check for the backing store
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Returns `Ok(())` when the backend answers.
    async fn ping(&self) -> StoreResult<()>;
}
