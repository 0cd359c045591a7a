use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{CreateEvaluationDto, Evaluation, EvaluationFilterParams, UpdateEvaluationDto};
use tracing::instrument;

use super::repository::EvaluationRepository;
use crate::metrics::track_record_created;

#[derive(Debug)]
pub struct EvaluationService {
    repo: Arc<EvaluationRepository>,
}

impl EvaluationService {
    pub fn new(repo: Arc<EvaluationRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &EvaluationFilterParams,
    ) -> Result<(Vec<Evaluation>, PaginationMeta), AppError> {
        let (evaluations, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters)
            .await?;
        Ok((evaluations, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Evaluation, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation not found"))
    }

    /// The group's summed weight, including this evaluation, may not exceed 100.
    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: CreateEvaluationDto) -> Result<Evaluation, AppError> {
        let evaluation = self.repo.create(&dto).await?;
        track_record_created("evaluation");
        Ok(evaluation)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: UpdateEvaluationDto) -> Result<Evaluation, AppError> {
        self.repo
            .update(id, &dto)
            .await?
            .ok_or_else(|| AppError::not_found("Evaluation not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Evaluation not found"));
        }
        Ok(())
    }
}
