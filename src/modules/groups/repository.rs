use aula_core::AppError;
use aula_models::{CreateGroupDto, Group, GroupFilterParams, UpdateGroupDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const GROUP_COLUMNS: &str =
    "id, course_id, teacher_id, name, period, capacity, created_at, updated_at";
const DUPLICATE_GROUP: &str = "A group with this name already exists for the course in this period";
const GROUP_FILTER: &str = "WHERE ($1::int IS NULL OR course_id = $1)
      AND ($2::int IS NULL OR teacher_id = $2)
      AND ($3::text IS NULL OR period = $3)";

#[derive(Clone, Debug)]
pub struct GroupRepository {
    db: PgPool,
}

impl GroupRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        filters: &GroupFilterParams,
    ) -> Result<(Vec<Group>, i64), AppError> {
        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM course_groups {GROUP_FILTER}"))
                .bind(filters.course_id)
                .bind(filters.teacher_id)
                .bind(&filters.period)
                .fetch_one(&self.db)
                .await
                .map_err(db_error("Failed to count groups"))?;

        let groups = sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM course_groups {GROUP_FILTER}
             ORDER BY period DESC, course_id, name
             LIMIT $4 OFFSET $5"
        ))
        .bind(filters.course_id)
        .bind(filters.teacher_id)
        .bind(&filters.period)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch groups"))?;

        Ok((groups, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Group>, AppError> {
        sqlx::query_as::<_, Group>(&format!(
            "SELECT {GROUP_COLUMNS} FROM course_groups WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to fetch group"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: &CreateGroupDto) -> Result<Group, AppError> {
        sqlx::query_as::<_, Group>(&format!(
            "INSERT INTO course_groups (course_id, teacher_id, name, period, capacity)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {GROUP_COLUMNS}"
        ))
        .bind(dto.course_id)
        .bind(dto.teacher_id)
        .bind(&dto.name)
        .bind(&dto.period)
        .bind(dto.capacity)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_GROUP))
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: &UpdateGroupDto) -> Result<Option<Group>, AppError> {
        sqlx::query_as::<_, Group>(&format!(
            "UPDATE course_groups
             SET teacher_id = COALESCE($2, teacher_id),
                 name = COALESCE($3, name),
                 period = COALESCE($4, period),
                 capacity = COALESCE($5, capacity),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {GROUP_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.teacher_id)
        .bind(&dto.name)
        .bind(&dto.period)
        .bind(dto.capacity)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_GROUP))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM course_groups WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete group"))?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of enrollments still occupying a seat (`active`).
    #[instrument(skip(self))]
    pub async fn count_active_enrollments(&self, id: i32) -> Result<i64, AppError> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments WHERE group_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to count enrollments"))
    }
}
