use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{CreateGradeDto, Grade, GradeFilterParams, UpdateGradeDto};
use tracing::instrument;

use super::repository::GradeRepository;
use crate::metrics::track_record_created;
use crate::modules::enrollments::repository::EnrollmentRepository;
use crate::modules::evaluations::repository::EvaluationRepository;

#[derive(Debug)]
pub struct GradeService {
    repo: Arc<GradeRepository>,
    evaluations: Arc<EvaluationRepository>,
    enrollments: Arc<EnrollmentRepository>,
}

impl GradeService {
    pub fn new(
        repo: Arc<GradeRepository>,
        evaluations: Arc<EvaluationRepository>,
        enrollments: Arc<EnrollmentRepository>,
    ) -> Self {
        Self {
            repo,
            evaluations,
            enrollments,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &GradeFilterParams,
    ) -> Result<(Vec<Grade>, PaginationMeta), AppError> {
        let (grades, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters)
            .await?;
        Ok((grades, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Grade, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))
    }

    /// Grades a student, who must be enrolled in the evaluation's group.
    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: CreateGradeDto, graded_by: i32) -> Result<Grade, AppError> {
        let evaluation = self
            .evaluations
            .find_by_id(dto.evaluation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation not found"))?;

        if !self
            .enrollments
            .is_enrolled(dto.student_id, evaluation.group_id)
            .await?
        {
            return Err(AppError::bad_request(
                "Student is not enrolled in the group of this evaluation",
            ));
        }

        let grade = self.repo.create(&dto, graded_by).await?;
        track_record_created("grade");
        Ok(grade)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(
        &self,
        id: i32,
        dto: UpdateGradeDto,
        graded_by: i32,
    ) -> Result<Grade, AppError> {
        self.repo
            .update(id, &dto, graded_by)
            .await?
            .ok_or_else(|| AppError::not_found("Grade not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Grade not found"));
        }
        Ok(())
    }
}
