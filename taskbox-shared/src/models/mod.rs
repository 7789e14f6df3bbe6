/// Database models for Taskbox
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts (credential store)
/// - `task`: Tasks owned by users
///
/// # Example
///
/// ```no_run
/// use taskbox_shared::models::user::{CreateUser, User};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         email: "user@example.com".to_string(),
///         encrypted_password: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
