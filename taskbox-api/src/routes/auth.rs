/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register a new user
/// - `POST /v1/auth/login` - Login and get an access token
/// - `GET /v1/auth/whoami` - Return the authenticated user

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::auth::CurrentUser,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use taskbox_shared::{
    auth::{jwt, password},
    models::user::{is_unique_email_violation, CreateUser, PublicUser, User},
};
use validator::Validate;

/// Register / login request
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response wrapping a single user projection
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// Public user projection
    pub user: PublicUser,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Signed access token
    pub access_token: String,

    /// Public user projection
    pub user: PublicUser,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// - `422 EmailAlreadyTaken`: a user with that email exists (checked up
///   front, and re-checked via the unique constraint so a concurrent
///   registration race still ends with exactly one success)
/// - `422 ValidationError`: malformed email or too-short password
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::EmailAlreadyTaken);
    }

    let encrypted_password = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email: req.email,
            encrypted_password,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_email_violation(&e) {
            ApiError::EmailAlreadyTaken
        } else {
            e.into()
        }
    })?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            user: PublicUser::from(&user),
        }),
    ))
}

/// Login and obtain an access token
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// { "email": "user@example.com", "password": "hunter22" }
/// ```
///
/// # Errors
///
/// - `422 EmailNotExists`: no user with that email
/// - `422 IncorrectPassword`: password doesn't verify against the stored hash
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<LoginResponse>)> {
    req.validate()?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or(ApiError::EmailNotExists)?;

    let valid = password::verify_password(&req.password, &user.encrypted_password)?;
    if !valid {
        return Err(ApiError::IncorrectPassword);
    }

    let claims = jwt::Claims::new(&user, state.token_expiry());
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            access_token,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Return the authenticated user's projection
///
/// Requires the authentication gate; the bound user is the current store
/// record, so the response reflects any changes since the token was issued.
pub async fn whoami(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<UserResponse>> {
    Ok(Json(UserResponse {
        user: PublicUser::from(&user),
    }))
}
