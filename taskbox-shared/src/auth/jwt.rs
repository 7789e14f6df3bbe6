/// Access-token generation and validation
///
/// Tokens are signed with HS256 (HMAC-SHA256) and embed the public projection
/// of the user they were issued for. The signing secret is injected by the
/// caller; it is configuration, never a compiled-in literal.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: set by the caller (the API server defaults to 24 hours)
/// - **Validation**: signature, expiration, and issuer checks
/// - **Fail closed**: any malformed, tampered, or wrongly-signed token is a
///   typed [`JwtError`], never a panic
///
/// # Example
///
/// ```no_run
/// use taskbox_shared::auth::jwt::{create_token, validate_token, Claims};
/// use taskbox_shared::models::user::User;
/// use chrono::Duration;
///
/// # fn example(user: &User) -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(user, Duration::hours(24));
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
///
/// let validated = validate_token(&token, "your-secret-key-at-least-32-bytes")?;
/// assert_eq!(validated.sub, user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Issuer claim stamped into every token
pub const ISSUER: &str = "taskbox";

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token signature, format, or issuer is invalid
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,
}

/// Token claims
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskbox")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
///
/// # Custom Claims
///
/// - `email`, `created_at`, `updated_at`: the public projection of the user
///   at issuance time. The authentication gate reloads the current record,
///   so these are informational, not authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Email at issuance time
    pub email: String,

    /// User record creation time
    pub created_at: DateTime<Utc>,

    /// User record update time at issuance
    pub updated_at: DateTime<Utc>,

    /// Issuer - always "taskbox"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user, valid for the given duration
    pub fn new(user: &User, valid_for: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: user.id,
            email: user.email.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + valid_for).timestamp(),
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a signed token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a token and extracts its claims
///
/// Verifies the signature, the expiration, and the issuer. Every failure
/// mode, including garbage input, maps to a [`JwtError`] so callers can
/// convert it into a rejection instead of crashing the request pipeline.
///
/// # Errors
///
/// - `JwtError::Expired` if the token is past its `exp`
/// - `JwtError::InvalidToken` for any other signature/format/issuer failure
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: format!("test-{}@example.com", Uuid::new_v4()),
            encrypted_password: "$argon2id$test".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_claims_creation() {
        let user = test_user();
        let claims = Claims::new(&user, Duration::hours(24));

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.iss, ISSUER);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_create_and_validate_token() {
        let user = test_user();
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(&user, Duration::hours(24));
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user.id);
        assert_eq!(validated.email, user.email);
        assert_eq!(validated.created_at, claims.created_at);
        assert_eq!(validated.updated_at, claims.updated_at);
        assert_eq!(validated.iss, ISSUER);
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(&test_user(), Duration::hours(24));
        let token = create_token(&claims, "secret-one-that-is-32-bytes-long!").expect("create");

        let result = validate_token(&token, "secret-two-that-is-32-bytes-long!");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret-key-at-least-32-bytes-long";

        // Expired an hour ago, well past the default leeway
        let claims = Claims::new(&test_user(), Duration::seconds(-3600));
        assert!(claims.is_expired());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(matches!(result, Err(JwtError::Expired)));
    }

    #[test]
    fn test_validate_garbage_input() {
        let secret = "test-secret-key-at-least-32-bytes-long";

        for garbage in ["", "not-a-token", "a.b.c", "eyJhbGciOiJIUzI1NiJ9..sig"] {
            let result = validate_token(garbage, secret);
            assert!(result.is_err(), "'{}' should be rejected", garbage);
        }
    }

    #[test]
    fn test_validate_tampered_token() {
        let secret = "test-secret-key-at-least-32-bytes-long";
        let claims = Claims::new(&test_user(), Duration::hours(24));
        let token = create_token(&claims, secret).expect("create");

        // Flip a character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = format!("x{}", &parts[1][1..]);
        let tampered = parts.join(".");

        assert!(validate_token(&tampered, secret).is_err());
    }
}
