/// Authentication endpoints
///
/// - `POST /register` - Create an account and get a token
/// - `POST /login` - Get a new token for an existing account
/// - `POST /logout` - Revoke every token of the current user (bearer)
/// - `GET /me` - Current user (bearer)
///
/// Tokens are opaque strings of the form `{id}|{secret}` and are shown only
/// in the register and login responses.

use axum::{extract::State, http::StatusCode, Extension, Json};
use postboard_shared::models::user::User;
use postboard_shared::services::{Credentials, Registration, Session};
use postboard_shared::validation::not_blank;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiResult, ServiceResultExt},
    extract::ValidatedJson,
    routes::{DataResponse, MessageResponse},
};

/// Register request
///
/// ```json
/// { "name": "Jane", "email": "jane@example.com", "password": "secret" }
/// ```
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "The name field is required."),
        custom(function = "not_blank", message = "The name field is required."),
        length(max = 255, message = "The name field must not be greater than 255 characters.")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        custom(function = "not_blank", message = "The password field is required.")
    )]
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(req: RegisterRequest) -> Self {
        Registration {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        }
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(
        required(message = "The email field is required."),
        email(message = "The email field must be a valid email address."),
        length(max = 255, message = "The email field must not be greater than 255 characters.")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "The password field is required."),
        custom(function = "not_blank", message = "The password field is required.")
    )]
    pub password: Option<String>,
}

impl From<LoginRequest> for Credentials {
    fn from(req: LoginRequest) -> Self {
        Credentials {
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        }
    }
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// Plaintext bearer token
    pub token: String,

    pub message: &'static str,

    pub data: User,
}

/// Register a new user
///
/// # Errors
///
/// - `422` if a field is missing or invalid, or the email is taken
/// - `500 {"message": "Registration failed"}` on unexpected failures
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<TokenResponse>)> {
    let authenticated = state
        .auth
        .register(req.into())
        .await
        .or_fail("Registration failed")?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: authenticated.token,
            message: "User registered successfully",
            data: authenticated.user,
        }),
    ))
}

/// Log in with email and password
///
/// Earlier tokens of the user stay valid.
///
/// # Errors
///
/// - `422` if a field is missing, or with `errors.email` when the
///   credentials do not match
/// - `500 {"message": "Login failed"}` on unexpected failures
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let authenticated = state.auth.login(req.into()).await.or_fail("Login failed")?;

    Ok(Json(TokenResponse {
        token: authenticated.token,
        message: "Logged in successfully",
        data: authenticated.user,
    }))
}

/// Revoke every token of the current user
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<MessageResponse>> {
    state.auth.logout(&session).await.or_fail("Logout failed")?;

    Ok(MessageResponse::new("Logged out successfully"))
}

/// Current user
pub async fn me(Extension(session): Extension<Session>) -> Json<DataResponse<User>> {
    DataResponse::new(session.user)
}
