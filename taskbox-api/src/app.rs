/// Application state and router builder
///
/// This module defines the shared application state and the explicit route
/// registration list: every endpoint and the gates in front of it are wired
/// here, at startup, in one place.
///
/// # Example
///
/// ```no_run
/// use taskbox_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    integrations::jsonplaceholder::{JsonPlaceholderClient, TodoSource},
    middleware::security::SecurityHeadersLayer,
};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use chrono::Duration;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; clones are
/// cheap (pool handle plus Arcs).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// External todo source; swapped for a stub in tests
    pub todos: Arc<dyn TodoSource>,
}

impl AppState {
    /// Creates application state with the real external todo client
    pub fn new(db: PgPool, config: Config) -> Self {
        let todos = Arc::new(JsonPlaceholderClient::new(&config.import));
        Self {
            db,
            config: Arc::new(config),
            todos,
        }
    }

    /// Gets the secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Gets the configured access-token lifetime
    pub fn token_expiry(&self) -> Duration {
        Duration::hours(self.config.jwt.expiry_hours)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                   # Health check (public)
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register    # public
///     │   ├── POST /login       # public
///     │   └── GET  /whoami      # auth gate
///     └── /tasks/               # auth gate on the whole group
///         ├── POST /            # create
///         ├── GET  /            # list own
///         ├── POST /import      # bulk import from external API
///         └── /:id              # + ownership gate
///             ├── GET
///             ├── PUT
///             └── DELETE
/// ```
///
/// # Middleware Stack
///
/// Outermost first: security headers, CORS, request tracing, then the
/// per-group gates.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes: register/login are public, whoami sits behind the gate
    let public_auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let protected_auth_routes = Router::new()
        .route("/whoami", get(routes::auth::whoami))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_auth,
        ));

    // Single-task routes additionally pass the ownership gate
    let owned_task_routes = Router::new()
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::ownership::require_task_owner,
        ));

    // The whole task group requires authentication
    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route("/import", post(routes::tasks::import_tasks))
        .merge(owned_task_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_auth,
        ));

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes.merge(protected_auth_routes))
        .nest("/tasks", task_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
