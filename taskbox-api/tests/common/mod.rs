/// Common test utilities for integration tests
///
/// These tests drive the real router end-to-end and therefore require a
/// running PostgreSQL instance plus configuration in the environment (or a
/// `.env` file):
///
/// ```bash
/// DATABASE_URL=postgresql://localhost/taskbox_test
/// JWT_SECRET=test-secret-key-at-least-32-bytes-long
/// ```
///
/// Every test creates its own users with unique emails, so tests can run
/// concurrently against a shared database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

use taskbox_api::app::{build_router, AppState};
use taskbox_api::config::Config;
use taskbox_api::integrations::jsonplaceholder::{Todo, TodoSource};
use taskbox_shared::auth::{jwt, password};
use taskbox_shared::models::user::{CreateUser, User};

/// Todo source that serves a fixed in-memory collection
pub struct StubTodoSource {
    pub todos: Vec<Todo>,
}

#[async_trait]
impl TodoSource for StubTodoSource {
    async fn list_todos(&self) -> anyhow::Result<Vec<Todo>> {
        Ok(self.todos.clone())
    }
}

/// Todo source that always fails, for exercising the 500 path
pub struct FailingTodoSource;

#[async_trait]
impl TodoSource for FailingTodoSource {
    async fn list_todos(&self) -> anyhow::Result<Vec<Todo>> {
        anyhow::bail!("connection refused")
    }
}

/// Test context containing the app under test and its database pool
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with an empty stub todo source
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_todo_source(Arc::new(StubTodoSource { todos: Vec::new() })).await
    }

    /// Creates a context with the given todo source
    pub async fn with_todo_source(todos: Arc<dyn TodoSource>) -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;
        taskbox_shared::db::migrations::run_migrations(&db).await?;

        let state = AppState {
            db: db.clone(),
            config: Arc::new(config.clone()),
            todos,
        };
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Creates a user with a unique email and the given password
    pub async fn create_user(&self, plaintext: &str) -> anyhow::Result<User> {
        let encrypted_password = password::hash_password(plaintext)?;

        let user = User::create(
            &self.db,
            CreateUser {
                email: format!("test-{}@example.com", Uuid::new_v4()),
                encrypted_password,
            },
        )
        .await?;

        Ok(user)
    }

    /// Issues an access token for a user, signed with the configured secret
    pub fn token_for(&self, user: &User) -> String {
        let claims = jwt::Claims::new(user, chrono::Duration::hours(1));
        jwt::create_token(&claims, &self.config.jwt.secret).expect("Should create token")
    }
}

/// Builds a request, optionally with a bearer token and a JSON body
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends a request through the router and returns (status, parsed JSON body)
///
/// An empty body parses as `serde_json::Value::Null`.
pub async fn send(
    app: &axum::Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    use tower::Service as _;

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
