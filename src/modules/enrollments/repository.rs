use aula_core::AppError;
use aula_models::{
    CreateEnrollmentDto, Enrollment, EnrollmentFilterParams, EnrollmentStatus,
};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const ENROLLMENT_COLUMNS: &str = "id, student_id, group_id, status, enrolled_at, updated_at";
const DUPLICATE_ENROLLMENT: &str = "Student is already enrolled in this group";
const ENROLLMENT_FILTER: &str = "WHERE ($1::int IS NULL OR student_id = $1)
      AND ($2::int IS NULL OR group_id = $2)
      AND ($3::text IS NULL OR status = $3)";

#[derive(Clone, Debug)]
pub struct EnrollmentRepository {
    db: PgPool,
}

/// Locks the group row for the rest of the transaction and checks that one
/// more active enrollment fits.
async fn reserve_seat(tx: &mut Transaction<'_, Postgres>, group_id: i32) -> Result<(), AppError> {
    let capacity: Option<i32> =
        sqlx::query_scalar("SELECT capacity FROM course_groups WHERE id = $1 FOR UPDATE")
            .bind(group_id)
            .fetch_optional(&mut **tx)
            .await
            .map_err(db_error("Failed to lock group"))?;

    let capacity = capacity.ok_or_else(|| AppError::not_found("Group not found"))?;

    let active: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM enrollments WHERE group_id = $1 AND status = 'active'",
    )
    .bind(group_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(db_error("Failed to count enrollments"))?;

    if active >= i64::from(capacity) {
        return Err(AppError::conflict(format!(
            "Group is full ({} of {} seats taken)",
            active, capacity
        )));
    }
    Ok(())
}

impl EnrollmentRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        filters: &EnrollmentFilterParams,
    ) -> Result<(Vec<Enrollment>, i64), AppError> {
        let status = filters.status.map(|s| s.as_str());

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM enrollments {ENROLLMENT_FILTER}"))
                .bind(filters.student_id)
                .bind(filters.group_id)
                .bind(status)
                .fetch_one(&self.db)
                .await
                .map_err(db_error("Failed to count enrollments"))?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments {ENROLLMENT_FILTER}
             ORDER BY enrolled_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        ))
        .bind(filters.student_id)
        .bind(filters.group_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch enrollments"))?;

        Ok((enrollments, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Enrollment>, AppError> {
        sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to fetch enrollment"))
    }

    /// Whether the student holds a non-withdrawn enrollment in the group.
    #[instrument(skip(self))]
    pub async fn is_enrolled(&self, student_id: i32, group_id: i32) -> Result<bool, AppError> {
        sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM enrollments
                WHERE student_id = $1 AND group_id = $2 AND status <> 'withdrawn'
            )",
        )
        .bind(student_id)
        .bind(group_id)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to check enrollment"))
    }

    /// Inserts an `active` enrollment if the group still has a free seat.
    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: &CreateEnrollmentDto) -> Result<Enrollment, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        reserve_seat(&mut tx, dto.group_id).await?;

        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (student_id, group_id, status)
             VALUES ($1, $2, 'active')
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(dto.student_id)
        .bind(dto.group_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_ENROLLMENT))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit enrollment"))?;

        Ok(enrollment)
    }

    /// Changes the status. Re-activating an enrollment takes a seat again.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        id: i32,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>, AppError> {
        let mut tx = self
            .db
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let current = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to fetch enrollment"))?;

        let Some(current) = current else {
            return Ok(None);
        };

        if status == EnrollmentStatus::Active && current.status != status.as_str() {
            reserve_seat(&mut tx, current.group_id).await?;
        }

        let updated = sqlx::query_as::<_, Enrollment>(&format!(
            "UPDATE enrollments SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to update enrollment"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit enrollment"))?;

        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete enrollment"))?;

        Ok(result.rows_affected() > 0)
    }
}
