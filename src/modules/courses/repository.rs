use aula_core::AppError;
use aula_models::{Course, CreateCourseDto, UpdateCourseDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const COURSE_COLUMNS: &str = "id, code, name, description, credits, created_at, updated_at";
const DUPLICATE_CODE: &str = "A course with this code already exists";

#[derive(Clone, Debug)]
pub struct CourseRepository {
    db: PgPool,
}

impl CourseRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self, limit: i64, offset: i64) -> Result<(Vec<Course>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.db)
            .await
            .map_err(db_error("Failed to count courses"))?;

        let courses = sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY code LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch courses"))?;

        Ok((courses, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("Failed to fetch course"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: &CreateCourseDto) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "INSERT INTO courses (code, name, description, credits)
             VALUES ($1, $2, $3, $4)
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.credits)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_CODE))
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: &UpdateCourseDto) -> Result<Option<Course>, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "UPDATE courses
             SET code = COALESCE($2, code),
                 name = COALESCE($3, name),
                 description = COALESCE($4, description),
                 credits = COALESCE($5, credits),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {COURSE_COLUMNS}"
        ))
        .bind(id)
        .bind(&dto.code)
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.credits)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_CODE))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete course"))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    pub async fn exists(&self, id: i32) -> Result<bool, AppError> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM courses WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await
            .map_err(db_error("Failed to check course"))
    }
}
