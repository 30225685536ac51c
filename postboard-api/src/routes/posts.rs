/// Posts endpoints
///
/// | Method      | Path          | Auth   |
/// |-------------|---------------|--------|
/// | GET         | `/posts`      | none   |
/// | POST        | `/posts`      | bearer |
/// | GET         | `/posts/:id`  | none   |
/// | PUT / PATCH | `/posts/:id`  | bearer |
/// | DELETE      | `/posts/:id`  | bearer |
///
/// Any signed-in user may edit or delete any post; the creator is recorded
/// in `user_id` but not enforced.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use postboard_shared::models::post::{Post, UpdatePost};
use postboard_shared::services::{PostDraft, Session};
use postboard_shared::validation::not_blank;
use serde::Deserialize;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ServiceResultExt},
    extract::ValidatedJson,
    routes::{DataResponse, MessageResponse},
};

/// Create post request
#[derive(Debug, Deserialize, Validate)]
pub struct StorePostRequest {
    #[validate(
        required(message = "The title field is required."),
        custom(function = "not_blank", message = "The title field is required."),
        length(max = 255, message = "The title field must not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "The content field is required."),
        custom(function = "not_blank", message = "The content field is required.")
    )]
    pub content: Option<String>,
}

impl From<StorePostRequest> for PostDraft {
    fn from(req: StorePostRequest) -> Self {
        PostDraft {
            title: req.title.unwrap_or_default(),
            content: req.content.unwrap_or_default(),
        }
    }
}

/// Update post request; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(
        custom(function = "not_blank", message = "The title field is required."),
        length(max = 255, message = "The title field must not be greater than 255 characters.")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "not_blank", message = "The content field is required."))]
    pub content: Option<String>,
}

impl From<UpdatePostRequest> for UpdatePost {
    fn from(req: UpdatePostRequest) -> Self {
        UpdatePost {
            title: req.title,
            content: req.content,
        }
    }
}

/// Path ids that are not integers name no post
fn post_id(raw: &str) -> ApiResult<i64> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Post not found".to_string()))
}

/// List every post, oldest first
pub async fn index(State(state): State<AppState>) -> ApiResult<Json<DataResponse<Vec<Post>>>> {
    let posts = state.posts.list().await.or_fail("Failed to fetch posts")?;

    Ok(DataResponse::new(posts))
}

pub async fn store(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    ValidatedJson(req): ValidatedJson<StorePostRequest>,
) -> ApiResult<(StatusCode, Json<DataResponse<Post>>)> {
    let post = state
        .posts
        .create(&session, req.into())
        .await
        .or_fail("Failed to create post")?;

    Ok((
        StatusCode::CREATED,
        DataResponse::with_message(post, "Post created successfully"),
    ))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = state
        .posts
        .get(post_id(&id)?)
        .await
        .or_fail("Failed to fetch post")?;

    Ok(DataResponse::new(post))
}

/// Partial update, served for both PUT and PATCH
pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<DataResponse<Post>>> {
    let post = state
        .posts
        .update(&session, post_id(&id)?, req.into())
        .await
        .or_fail("Failed to update post")?;

    Ok(DataResponse::with_message(post, "Post updated successfully"))
}

pub async fn destroy(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .posts
        .delete(&session, post_id(&id)?)
        .await
        .or_fail("Failed to delete post")?;

    Ok(MessageResponse::new("Post deleted successfully"))
}
