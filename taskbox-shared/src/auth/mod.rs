/// Authentication primitives for Taskbox
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access-token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with a fresh random salt per hash
/// - **Access Tokens**: HS256 signing with configurable expiration
/// - **Constant-time Comparison**: Verification never short-circuits on
///   the position of a mismatch
///
/// # Example
///
/// ```no_run
/// use taskbox_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
