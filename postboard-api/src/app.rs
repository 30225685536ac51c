/// Application state and router builder
///
/// [`AppState`] is the composition root: it wires stores, password hashing
/// and token handling into the services the handlers call.
///
/// # Example
///
/// ```no_run
/// use postboard_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::postgres(pool, config)?);
/// # Ok(())
/// # }
/// ```

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use postboard_shared::auth::password::{Argon2Hasher, CredentialHasher};
use postboard_shared::auth::token::AccessTokens;
use postboard_shared::services::{AuthService, PostService};
use postboard_shared::store::postgres::{PgPostStore, PgTokenStore, PgUserStore};
use postboard_shared::store::{HealthCheck, PostStore, TokenStore, UserStore};
use sqlx::PgPool;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{
    config::Config,
    error::ApiError,
    middleware::{auth::require_auth, security::SecurityHeadersLayer},
    routes,
};

/// Shared application state
///
/// Cloned for each request via Axum's `State` extractor; every field is
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,

    pub posts: PostService,

    /// Store check used by `GET /health`
    pub health: Arc<dyn HealthCheck>,

    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services from arbitrary store adapters
    pub fn from_parts(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        tokens: Arc<dyn TokenStore>,
        hasher: Arc<dyn CredentialHasher>,
        health: Arc<dyn HealthCheck>,
        config: Config,
    ) -> Self {
        Self {
            auth: AuthService::new(users, AccessTokens::new(tokens), hasher),
            posts: PostService::new(posts),
            health,
            config: Arc::new(config),
        }
    }

    /// Production wiring over a PostgreSQL pool
    ///
    /// # Errors
    ///
    /// Returns an error if the configured Argon2 parameters are invalid.
    pub fn postgres(pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let hasher = Argon2Hasher::new(config.hashing)?;

        Ok(Self::from_parts(
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgPostStore::new(pool.clone())),
            Arc::new(PgTokenStore::new(pool.clone())),
            Arc::new(hasher),
            Arc::new(pool),
            config,
        ))
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health
/// ├── POST   /register
/// ├── POST   /login
/// ├── POST   /logout            (bearer)
/// ├── GET    /me                (bearer)
/// ├── GET    /posts
/// ├── POST   /posts             (bearer)
/// ├── GET    /posts/:id
/// ├── PUT    /posts/:id         (bearer)
/// ├── PATCH  /posts/:id         (bearer)
/// └── DELETE /posts/:id         (bearer)
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, panic
/// catching. Authentication is a route layer on the bearer routes only, so
/// unknown paths still answer 404 rather than 401.
pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/posts", get(routes::posts::index))
        .route("/posts/:id", get(routes::posts::show));

    let protected = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/posts", post(routes::posts::store))
        .route(
            "/posts/:id",
            put(routes::posts::update)
                .patch(routes::posts::update)
                .delete(routes::posts::destroy),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .fallback(routes::not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = &config.api.cors_origins;

    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };

    tracing::error!(panic = %detail, "Request handler panicked");

    ApiError::InternalError("Server error".to_string()).into_response()
}
