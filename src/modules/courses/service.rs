use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{Course, CreateCourseDto, UpdateCourseDto};
use tracing::instrument;

use super::repository::CourseRepository;
use crate::metrics::track_record_created;

#[derive(Debug)]
pub struct CourseService {
    repo: Arc<CourseRepository>,
}

impl CourseService {
    pub fn new(repo: Arc<CourseRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<Course>, PaginationMeta), AppError> {
        let (courses, total) = self.repo.find_all(params.limit(), params.offset()).await?;
        Ok((courses, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Course, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course = self.repo.create(&dto).await?;
        track_record_created("course");
        Ok(course)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: UpdateCourseDto) -> Result<Course, AppError> {
        self.repo
            .update(id, &dto)
            .await?
            .ok_or_else(|| AppError::not_found("Course not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Course not found"));
        }
        Ok(())
    }
}
