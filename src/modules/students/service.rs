use std::sync::Arc;

use aula_core::{AppError, PaginationMeta, PaginationParams, hash_password};
use aula_models::{CreateStudentDto, Student, StudentFilterParams, UpdateStudentDto};
use tracing::instrument;

use super::repository::StudentRepository;
use crate::metrics::track_record_created;

#[derive(Debug)]
pub struct StudentService {
    repo: Arc<StudentRepository>,
}

impl StudentService {
    pub fn new(repo: Arc<StudentRepository>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &StudentFilterParams,
    ) -> Result<(Vec<Student>, PaginationMeta), AppError> {
        let (students, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters.search.as_deref())
            .await?;
        Ok((students, params.meta(total)))
    }

    /// Lookup used by the ownership check; a missing student is `None`.
    pub async fn find(&self, id: i32) -> Result<Option<Student>, AppError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Student, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))
    }

    pub async fn find_by_user(&self, user_id: i32) -> Result<Option<Student>, AppError> {
        self.repo.find_by_user_id(user_id).await
    }

    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn create(&self, dto: CreateStudentDto) -> Result<Student, AppError> {
        let password_hash = hash_password(&dto.password)?;
        let student = self.repo.create(&dto, &password_hash).await?;
        track_record_created("student");
        Ok(student)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: UpdateStudentDto) -> Result<Student, AppError> {
        self.repo
            .update(id, &dto)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Student not found"));
        }
        Ok(())
    }
}
