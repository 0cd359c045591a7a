use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{
    AttendanceFilterParams, AttendanceRecord, CreateAttendanceDto, EnrollmentStatus,
    UpdateAttendanceDto,
};
use tracing::instrument;

use super::repository::AttendanceRepository;
use crate::metrics::track_record_created;
use crate::modules::enrollments::repository::EnrollmentRepository;

#[derive(Debug)]
pub struct AttendanceService {
    repo: Arc<AttendanceRepository>,
    enrollments: Arc<EnrollmentRepository>,
}

impl AttendanceService {
    pub fn new(repo: Arc<AttendanceRepository>, enrollments: Arc<EnrollmentRepository>) -> Self {
        Self { repo, enrollments }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &AttendanceFilterParams,
    ) -> Result<(Vec<AttendanceRecord>, PaginationMeta), AppError> {
        let (records, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters)
            .await?;
        Ok((records, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<AttendanceRecord, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Attendance record not found"))
    }

    /// Records attendance on behalf of `recorded_by` (the caller's user id).
    #[instrument(skip(self, dto))]
    pub async fn create(
        &self,
        dto: CreateAttendanceDto,
        recorded_by: i32,
    ) -> Result<AttendanceRecord, AppError> {
        let enrollment = self
            .enrollments
            .find_by_id(dto.enrollment_id)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment not found"))?;

        if enrollment.status == EnrollmentStatus::Withdrawn.as_str() {
            return Err(AppError::bad_request(
                "Cannot record attendance for a withdrawn enrollment",
            ));
        }

        let record = self.repo.create(&dto, recorded_by).await?;
        track_record_created("attendance");
        Ok(record)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateAttendanceDto,
        recorded_by: i32,
    ) -> Result<AttendanceRecord, AppError> {
        self.repo
            .update(id, &dto, recorded_by)
            .await?
            .ok_or_else(|| AppError::not_found("Attendance record not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Attendance record not found"));
        }
        Ok(())
    }
}
