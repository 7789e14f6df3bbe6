/// Authentication gate
///
/// Validates the `Authorization: Bearer <token>` header, loads the current
/// user record, and binds it to the request as a [`CurrentUser`] extension
/// for downstream gates and handlers.
///
/// All rejection paths produce the identical 401 response; a caller cannot
/// tell a missing header from a bad signature or a vanished user.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskbox_api::app::AppState;
/// use taskbox_api::middleware::auth::{require_auth, CurrentUser};
///
/// async fn handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.email)
/// }
///
/// fn routes(state: AppState) -> Router<AppState> {
///     Router::new()
///         .route("/me", get(handler))
///         .layer(middleware::from_fn_with_state(state, require_auth))
/// }
/// ```

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{app::AppState, error::ApiError};
use taskbox_shared::{auth::jwt, models::user::User};

/// Authenticated user bound to the request after the gate runs
///
/// Holds the full current record loaded from the store, not the (possibly
/// stale) token payload.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer-token authentication middleware
///
/// # Errors
///
/// Returns 401 `Unauthorized` if:
/// - The authorization header is missing or lacks the `Bearer ` prefix
/// - Token validation fails (bad signature, expired, malformed)
/// - The referenced user no longer exists
///
/// A store failure is a 500, not a 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = jwt::validate_token(token, state.jwt_secret()).map_err(|e| {
        tracing::debug!(error = %e, "Token validation failed");
        ApiError::Unauthorized
    })?;

    // Exactly one primary-key lookup per request
    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}
