use aula_core::AppError;
use aula_models::{User, UserWithPassword};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::db_error;

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("Failed to fetch user"))
    }

    /// Includes the password hash; only the login flow uses it.
    #[instrument(skip(self))]
    pub async fn find_with_password(
        &self,
        email: &str,
    ) -> Result<Option<UserWithPassword>, AppError> {
        sqlx::query_as::<_, UserWithPassword>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE LOWER(email) = LOWER($1)"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to fetch user"))
    }
}
