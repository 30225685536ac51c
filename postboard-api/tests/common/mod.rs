//! Common test utilities for integration tests
//!
//! Builds the full router over the in-memory stores, so these tests need
//! neither PostgreSQL nor a network socket. Requests go straight through
//! `tower::Service::call`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use postboard_api::app::{build_router, AppState};
use postboard_api::config::{ApiConfig, Config, LogFormat};
use postboard_shared::auth::password::{Argon2Hasher, HashingConfig};
use postboard_shared::db::pool::DatabaseConfig;
use postboard_shared::store::memory::{
    AlwaysHealthy, MemoryPostStore, MemoryTokenStore, MemoryUserStore,
};
use serde_json::{json, Value};
use tower::Service as _;

/// Test context holding the router and the stores behind it
pub struct TestContext {
    pub app: Router,
    pub users: Arc<MemoryUserStore>,
    pub tokens: Arc<MemoryTokenStore>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let tokens = Arc::new(MemoryTokenStore::default());

        // Cheap Argon2 parameters keep the suite fast
        let hashing = HashingConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        };
        let hasher = Argon2Hasher::new(hashing).expect("valid Argon2 parameters");

        let state = AppState::from_parts(
            users.clone(),
            Arc::new(MemoryPostStore::default()),
            tokens.clone(),
            Arc::new(hasher),
            Arc::new(AlwaysHealthy),
            test_config(hashing),
        );

        Self {
            app: build_router(state),
            users,
            tokens,
        }
    }

    /// Sends a request and returns the status with the decoded JSON body
    ///
    /// Empty bodies decode to `Value::Null`.
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.call(request).await
    }

    /// Sends a prebuilt request
    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                panic!(
                    "response body is not JSON ({err}): {}",
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        (status, json)
    }

    /// Registers a user with password `password` and returns its token
    pub async fn register(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "password": "password",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Logs in with password `password` and returns the new token
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/login",
                None,
                Some(json!({ "email": email, "password": "password" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    /// Creates a post and returns its JSON representation
    pub async fn create_post(&self, token: &str, title: &str, content: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/posts",
                Some(token),
                Some(json!({ "title": title, "content": content })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "create post failed: {body}");
        body["data"].clone()
    }
}

fn test_config(hashing: HashingConfig) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            ..Default::default()
        },
        hashing,
        log_format: LogFormat::Text,
    }
}
