use aula_core::AppError;
use aula_models::{CreateGradeDto, Grade, GradeFilterParams, UpdateGradeDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const GRADE_SELECT: &str = "SELECT g.id, g.evaluation_id, g.student_id, g.score, g.feedback,
        g.graded_by, g.created_at, g.updated_at";
const GRADE_COLUMNS: &str =
    "id, evaluation_id, student_id, score, feedback, graded_by, created_at, updated_at";
const DUPLICATE_GRADE: &str = "Student already has a grade for this evaluation";
const GRADE_FILTER: &str = "WHERE ($1::int IS NULL OR g.evaluation_id = $1)
      AND ($2::int IS NULL OR g.student_id = $2)
      AND ($3::int IS NULL OR ev.group_id = $3)";

#[derive(Clone, Debug)]
pub struct GradeRepository {
    db: PgPool,
}

impl GradeRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        filters: &GradeFilterParams,
    ) -> Result<(Vec<Grade>, i64), AppError> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM grades g
             JOIN evaluations ev ON ev.id = g.evaluation_id
             {GRADE_FILTER}"
        ))
        .bind(filters.evaluation_id)
        .bind(filters.student_id)
        .bind(filters.group_id)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to count grades"))?;

        let grades = sqlx::query_as::<_, Grade>(&format!(
            "{GRADE_SELECT}
             FROM grades g
             JOIN evaluations ev ON ev.id = g.evaluation_id
             {GRADE_FILTER}
             ORDER BY ev.group_id, g.evaluation_id, g.student_id
             LIMIT $4 OFFSET $5"
        ))
        .bind(filters.evaluation_id)
        .bind(filters.student_id)
        .bind(filters.group_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch grades"))?;

        Ok((grades, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Grade>, AppError> {
        sqlx::query_as::<_, Grade>(&format!("SELECT {GRADE_COLUMNS} FROM grades WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .map_err(db_error("Failed to fetch grade"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: &CreateGradeDto, graded_by: i32) -> Result<Grade, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "INSERT INTO grades (evaluation_id, student_id, score, feedback, graded_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {GRADE_COLUMNS}"
        ))
        .bind(dto.evaluation_id)
        .bind(dto.student_id)
        .bind(dto.score)
        .bind(&dto.feedback)
        .bind(graded_by)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_GRADE))
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: i32,
        dto: &UpdateGradeDto,
        graded_by: i32,
    ) -> Result<Option<Grade>, AppError> {
        sqlx::query_as::<_, Grade>(&format!(
            "UPDATE grades
             SET score = COALESCE($2, score),
                 feedback = COALESCE($3, feedback),
                 graded_by = $4,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {GRADE_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.score)
        .bind(&dto.feedback)
        .bind(graded_by)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to update grade"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM grades WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete grade"))?;

        Ok(result.rows_affected() > 0)
    }
}
