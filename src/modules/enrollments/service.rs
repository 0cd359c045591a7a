use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{
    CreateEnrollmentDto, Enrollment, EnrollmentFilterParams, UpdateEnrollmentDto,
};
use tracing::instrument;

use super::repository::EnrollmentRepository;
use crate::metrics::track_record_created;
use crate::modules::students::repository::StudentRepository;

#[derive(Debug)]
pub struct EnrollmentService {
    repo: Arc<EnrollmentRepository>,
    students: Arc<StudentRepository>,
}

impl EnrollmentService {
    pub fn new(repo: Arc<EnrollmentRepository>, students: Arc<StudentRepository>) -> Self {
        Self { repo, students }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &EnrollmentFilterParams,
    ) -> Result<(Vec<Enrollment>, PaginationMeta), AppError> {
        let (enrollments, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters)
            .await?;
        Ok((enrollments, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Enrollment, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment not found"))
    }

    pub async fn is_enrolled(&self, student_id: i32, group_id: i32) -> Result<bool, AppError> {
        self.repo.is_enrolled(student_id, group_id).await
    }

    /// Enrolls a student. The group must exist and have a free seat.
    #[instrument(skip(self))]
    pub async fn create(&self, dto: CreateEnrollmentDto) -> Result<Enrollment, AppError> {
        if !self.students.exists(dto.student_id).await? {
            return Err(AppError::not_found("Student not found"));
        }

        let enrollment = self.repo.create(&dto).await?;
        track_record_created("enrollment");
        Ok(enrollment)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: i32, dto: UpdateEnrollmentDto) -> Result<Enrollment, AppError> {
        self.repo
            .update_status(id, dto.status)
            .await?
            .ok_or_else(|| AppError::not_found("Enrollment not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Enrollment not found"));
        }
        Ok(())
    }
}
