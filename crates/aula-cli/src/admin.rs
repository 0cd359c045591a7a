//! Administrator account creation.

use aula_core::hash_password;
use sqlx::PgPool;

use crate::CliError;

/// Creates a user with the `admin` role and returns its id.
///
/// Fails when the email is already registered.
pub async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<i32, CliError> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.message))?;

    let user_id = sqlx::query_scalar::<_, i32>(
        "INSERT INTO users (first_name, last_name, email, password, role)
         VALUES ($1, $2, $3, $4, 'admin')
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
