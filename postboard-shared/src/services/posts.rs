/// Post service
///
/// Reads are public. Writes take the caller's [`Session`] explicitly; it is
/// used to record the creator and for logging. There is no ownership check:
/// any authenticated user may update or delete any post.

use std::sync::Arc;

use tracing::info;

use super::auth::Session;
use crate::error::{ServiceError, ServiceResult};
use crate::models::post::{NewPost, Post, UpdatePost};
use crate::store::PostStore;

/// Validated input for a new post
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>) -> Self {
        Self { posts }
    }

    /// All posts, in store order
    pub async fn list(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list().await?)
    }

    pub async fn get(&self, id: i64) -> ServiceResult<Post> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn create(&self, session: &Session, draft: PostDraft) -> ServiceResult<Post> {
        let post = self
            .posts
            .create(NewPost {
                user_id: Some(session.user.id),
                title: draft.title,
                content: draft.content,
            })
            .await?;

        info!(post_id = post.id, user_id = session.user.id, "Post created");
        Ok(post)
    }

    /// Applies a partial update; fields left as `None` keep their values
    pub async fn update(
        &self,
        session: &Session,
        id: i64,
        changes: UpdatePost,
    ) -> ServiceResult<Post> {
        let post = self
            .posts
            .update(id, changes)
            .await?
            .ok_or(ServiceError::NotFound("Post"))?;

        info!(post_id = id, user_id = session.user.id, "Post updated");
        Ok(post)
    }

    /// Deletes a post; zero rows affected is reported as not found
    pub async fn delete(&self, session: &Session, id: i64) -> ServiceResult<()> {
        if !self.posts.delete(id).await? {
            return Err(ServiceError::NotFound("Post"));
        }

        info!(post_id = id, user_id = session.user.id, "Post deleted");
        Ok(())
    }
}
