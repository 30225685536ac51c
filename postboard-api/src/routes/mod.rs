/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Register, login, logout and current user
/// - `posts`: Posts CRUD
///
/// Successful responses share two envelopes: [`DataResponse`] for anything
/// that returns a resource and [`MessageResponse`] for bare confirmations.

use axum::Json;
use serde::Serialize;

use crate::error::ApiError;

pub mod auth;
pub mod health;
pub mod posts;

/// `{ "data": ..., "message": ... }` with the message optional
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Json<Self> {
        Json(Self {
            data,
            message: None,
        })
    }

    pub fn with_message(data: T, message: &'static str) -> Json<Self> {
        Json(Self {
            data,
            message: Some(message),
        })
    }
}

/// `{ "message": ... }`
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self { message })
    }
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
