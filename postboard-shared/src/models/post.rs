/// Post model
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT,
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `user_id` records who created the post. It is informational only:
/// any authenticated user may update or delete any post.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID
    pub id: i64,

    /// User that created the post, if known
    pub user_id: Option<i64>,

    /// Title
    pub title: String,

    /// Body text
    pub content: String,

    /// When the post was created
    pub created_at: DateTime<Utc>,

    /// When the post was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a post
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Option<i64>,
    pub title: String,
    pub content: String,
}

/// Partial update of a post. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePost {
    /// Applies the supplied fields to `post` in place
    pub fn apply_to(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post() -> Post {
        Post {
            id: 5,
            user_id: Some(1),
            title: "Original title".to_string(),
            content: "Original content".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_apply_partial_update_keeps_other_fields() {
        let mut post = sample_post();

        UpdatePost {
            title: Some("New title".to_string()),
            content: None,
        }
        .apply_to(&mut post);

        assert_eq!(post.title, "New title");
        assert_eq!(post.content, "Original content");
        assert_eq!(post.user_id, Some(1));
    }

    #[test]
    fn test_apply_empty_update_is_noop() {
        let mut post = sample_post();
        let before = post.clone();

        UpdatePost::default().apply_to(&mut post);

        assert_eq!(post, before);
    }
}
