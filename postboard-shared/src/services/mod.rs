/// Business services
///
/// - `auth`: registration, login, logout, session resolution
/// - `posts`: CRUD over posts
///
/// Both are cheap to clone (they hold `Arc`s to their stores).

pub mod auth;
pub mod posts;

pub use auth::{AuthService, Authenticated, Credentials, Registration, Session};
pub use posts::{PostDraft, PostService};
