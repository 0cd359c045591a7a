use std::sync::Arc;

use aula_auth::Rol;
use aula_core::{AppError, PaginationMeta, PaginationParams};
use aula_models::{CreateGroupDto, Group, GroupFilterParams, UpdateGroupDto};
use tracing::instrument;

use super::repository::GroupRepository;
use crate::metrics::track_record_created;
use crate::modules::auth::repository::UserRepository;
use crate::modules::courses::repository::CourseRepository;

#[derive(Debug)]
pub struct GroupService {
    repo: Arc<GroupRepository>,
    courses: Arc<CourseRepository>,
    users: Arc<UserRepository>,
}

impl GroupService {
    pub fn new(
        repo: Arc<GroupRepository>,
        courses: Arc<CourseRepository>,
        users: Arc<UserRepository>,
    ) -> Self {
        Self {
            repo,
            courses,
            users,
        }
    }

    async fn ensure_teacher(&self, teacher_id: Option<i32>) -> Result<(), AppError> {
        let Some(teacher_id) = teacher_id else {
            return Ok(());
        };

        match self.users.find_by_id(teacher_id).await? {
            Some(user) if user.role == Rol::Docente.as_str() => Ok(()),
            Some(_) => Err(AppError::bad_request(
                "teacher_id must reference a user with role docente",
            )),
            None => Err(AppError::not_found("Teacher not found")),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        params: &PaginationParams,
        filters: &GroupFilterParams,
    ) -> Result<(Vec<Group>, PaginationMeta), AppError> {
        let (groups, total) = self
            .repo
            .find_all(params.limit(), params.offset(), filters)
            .await?;
        Ok((groups, params.meta(total)))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<Group, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))
    }

    #[instrument(skip(self, dto))]
    pub async fn create(&self, dto: CreateGroupDto) -> Result<Group, AppError> {
        if !self.courses.exists(dto.course_id).await? {
            return Err(AppError::not_found("Course not found"));
        }
        self.ensure_teacher(dto.teacher_id).await?;

        let group = self.repo.create(&dto).await?;
        track_record_created("group");
        Ok(group)
    }

    #[instrument(skip(self, dto))]
    pub async fn update(&self, id: i32, dto: UpdateGroupDto) -> Result<Group, AppError> {
        self.ensure_teacher(dto.teacher_id).await?;

        if let Some(capacity) = dto.capacity {
            let occupied = self.repo.count_active_enrollments(id).await?;
            if i64::from(capacity) < occupied {
                return Err(AppError::conflict(format!(
                    "Capacity {} is below the {} active enrollments of the group",
                    capacity, occupied
                )));
            }
        }

        self.repo
            .update(id, &dto)
            .await?
            .ok_or_else(|| AppError::not_found("Group not found"))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.repo.delete(id).await? {
            return Err(AppError::not_found("Group not found"));
        }
        Ok(())
    }
}
