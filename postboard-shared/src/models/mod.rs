/// Database models for Postboard
///
/// Plain data carried between the stores, the services and the API layer.
///
/// # Models
///
/// - `user`: User accounts and authentication
/// - `access_token`: Opaque bearer tokens issued at login/registration
/// - `post`: The single managed resource type
///
/// # Example
///
/// ```
/// use postboard_shared::models::user::NewUser;
///
/// let new_user = NewUser {
///     name: "Jane Doe".to_string(),
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// };
/// assert_eq!(new_user.email, "jane@example.com");
/// ```

pub mod access_token;
pub mod post;
pub mod user;
