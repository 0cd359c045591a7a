use aula_core::AppError;
use aula_models::{CreateStudentDto, Student, UpdateStudentDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const STUDENT_SELECT: &str = "
    SELECT s.id, s.user_id, s.student_code, u.first_name, u.last_name, u.email,
           s.birth_date, s.created_at, s.updated_at
    FROM students s
    JOIN users u ON u.id = s.user_id";

const DUPLICATE_STUDENT: &str = "A user with this email or a student with this code already exists";

#[derive(Clone, Debug)]
pub struct StudentRepository {
    db: PgPool,
}

impl StudentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// `search` matches names, email and student code, case-insensitively.
    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        search: Option<&str>,
    ) -> Result<(Vec<Student>, i64), AppError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));

        let filter = "WHERE ($1::text IS NULL
                OR u.first_name ILIKE $1 OR u.last_name ILIKE $1
                OR u.email ILIKE $1 OR s.student_code ILIKE $1)";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM students s JOIN users u ON u.id = s.user_id {filter}"
        ))
        .bind(&pattern)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to count students"))?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "{STUDENT_SELECT} {filter} ORDER BY u.last_name, u.first_name, s.id LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch students"))?;

        Ok((students, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Student>, AppError> {
        sqlx::query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("Failed to fetch student"))
    }

    #[instrument(skip(self))]
    pub async fn find_by_user_id(&self, user_id: i32) -> Result<Option<Student>, AppError> {
        sqlx::query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE s.user_id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("Failed to fetch student by user"))
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(db_error("Failed to check student"))
    }

    /// Creates the `estudiante` user account and the student profile together.
    #[instrument(skip(self, dto, password_hash))]
    pub async fn create(
        &self,
        dto: &CreateStudentDto,
        password_hash: &str,
    ) -> Result<Student, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let user_id: i32 = sqlx::query_scalar(
            "INSERT INTO users (email, password, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, 'estudiante')
             RETURNING id",
        )
        .bind(&dto.email)
        .bind(password_hash)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?;

        let student_id: i32 = sqlx::query_scalar(
            "INSERT INTO students (user_id, student_code, birth_date)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(&dto.student_code)
        .bind(dto.birth_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?;

        let student = sqlx::query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE s.id = $1"))
            .bind(student_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to load created student"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit student"))?;

        Ok(student)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: &UpdateStudentDto) -> Result<Option<Student>, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let updated = sqlx::query(
            "UPDATE students
             SET student_code = COALESCE($2, student_code),
                 birth_date = COALESCE($3, birth_date),
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&dto.student_code)
        .bind(dto.birth_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query(
            "UPDATE users
             SET first_name = COALESCE($2, first_name),
                 last_name = COALESCE($3, last_name),
                 email = COALESCE($4, email),
                 updated_at = NOW()
             WHERE id = (SELECT user_id FROM students WHERE id = $1)",
        )
        .bind(id)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_STUDENT))?;

        let student = sqlx::query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db_error("Failed to load updated student"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit student"))?;

        Ok(student)
    }

    /// Deletes the owning user account; the profile goes with it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM users WHERE id = (SELECT user_id FROM students WHERE id = $1)")
                .bind(id)
                .execute(&self.db)
                .await
                .map_err(db_error("Failed to delete student"))?;

        Ok(result.rows_affected() > 0)
    }
}
