use aula_core::AppError;
use aula_models::{AttendanceFilterParams, AttendanceRecord, CreateAttendanceDto, UpdateAttendanceDto};
use sqlx::PgPool;
use tracing::instrument;

use crate::db::{db_error, map_db_error};

const RECORD_SELECT: &str = "SELECT a.id, a.enrollment_id, e.student_id, e.group_id, a.session_date,
        a.status, a.notes, a.recorded_by, a.created_at, a.updated_at";
const DUPLICATE_RECORD: &str = "Attendance already recorded for this enrollment and date";
const RECORD_FILTER: &str = "WHERE ($1::int IS NULL OR e.student_id = $1)
      AND ($2::int IS NULL OR e.group_id = $2)
      AND ($3::int IS NULL OR a.enrollment_id = $3)
      AND ($4::date IS NULL OR a.session_date = $4)";

#[derive(Clone, Debug)]
pub struct AttendanceRepository {
    db: PgPool,
}

impl AttendanceRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn find_all(
        &self,
        limit: i64,
        offset: i64,
        filters: &AttendanceFilterParams,
    ) -> Result<(Vec<AttendanceRecord>, i64), AppError> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM attendance a
             JOIN enrollments e ON e.id = a.enrollment_id
             {RECORD_FILTER}"
        ))
        .bind(filters.student_id)
        .bind(filters.group_id)
        .bind(filters.enrollment_id)
        .bind(filters.session_date)
        .fetch_one(&self.db)
        .await
        .map_err(db_error("Failed to count attendance"))?;

        let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
            "{RECORD_SELECT}
             FROM attendance a
             JOIN enrollments e ON e.id = a.enrollment_id
             {RECORD_FILTER}
             ORDER BY a.session_date DESC, a.id DESC
             LIMIT $5 OFFSET $6"
        ))
        .bind(filters.student_id)
        .bind(filters.group_id)
        .bind(filters.enrollment_id)
        .bind(filters.session_date)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .map_err(db_error("Failed to fetch attendance"))?;

        Ok((records, total))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            "{RECORD_SELECT}
             FROM attendance a
             JOIN enrollments e ON e.id = a.enrollment_id
             WHERE a.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to fetch attendance record"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(
        &self,
        dto: &CreateAttendanceDto,
        recorded_by: i32,
    ) -> Result<AttendanceRecord, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            "WITH a AS (
                INSERT INTO attendance (enrollment_id, session_date, status, notes, recorded_by)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
             )
             {RECORD_SELECT}
             FROM a
             JOIN enrollments e ON e.id = a.enrollment_id"
        ))
        .bind(dto.enrollment_id)
        .bind(dto.session_date)
        .bind(dto.status.as_str())
        .bind(&dto.notes)
        .bind(recorded_by)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_db_error(e, DUPLICATE_RECORD))
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: i32,
        dto: &UpdateAttendanceDto,
        recorded_by: i32,
    ) -> Result<Option<AttendanceRecord>, AppError> {
        sqlx::query_as::<_, AttendanceRecord>(&format!(
            "WITH a AS (
                UPDATE attendance
                SET status = COALESCE($2, status),
                    notes = COALESCE($3, notes),
                    recorded_by = $4,
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             {RECORD_SELECT}
             FROM a
             JOIN enrollments e ON e.id = a.enrollment_id"
        ))
        .bind(id)
        .bind(dto.status.map(|s| s.as_str()))
        .bind(&dto.notes)
        .bind(recorded_by)
        .fetch_optional(&self.db)
        .await
        .map_err(db_error("Failed to update attendance record"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(db_error("Failed to delete attendance record"))?;

        Ok(result.rows_affected() > 0)
    }
}
