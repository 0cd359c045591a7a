//! Service names and factories.
//!
//! Every repository and service of the API is registered here as a singleton.
//! Factories resolve their dependencies by name, so the order of registration
//! does not matter; only [`crate::state::AppState::init`] resolves them.

use std::sync::Arc;
use std::time::Instant;

use aula_config::{AppConfig, JwtConfig};
use sqlx::PgPool;

use crate::container::{Container, ContainerError};
use crate::modules::attendance::{
    repository::AttendanceRepository, service::AttendanceService,
};
use crate::modules::auth::{repository::UserRepository, service::AuthService};
use crate::modules::courses::{repository::CourseRepository, service::CourseService};
use crate::modules::enrollments::{
    repository::EnrollmentRepository, service::EnrollmentService,
};
use crate::modules::evaluations::{
    repository::EvaluationRepository, service::EvaluationService,
};
use crate::modules::grades::{repository::GradeRepository, service::GradeService};
use crate::modules::groups::{repository::GroupRepository, service::GroupService};
use crate::modules::health::service::HealthService;
use crate::modules::rankings::{repository::RankingRepository, service::RankingService};
use crate::modules::students::{repository::StudentRepository, service::StudentService};

pub const DB: &str = "db";
pub const CONFIG: &str = "config";
pub const JWT_CONFIG: &str = "config.jwt";

pub const USER_REPOSITORY: &str = "userRepository";
pub const COURSE_REPOSITORY: &str = "courseRepository";
pub const STUDENT_REPOSITORY: &str = "studentRepository";
pub const GROUP_REPOSITORY: &str = "groupRepository";
pub const ENROLLMENT_REPOSITORY: &str = "enrollmentRepository";
pub const ATTENDANCE_REPOSITORY: &str = "attendanceRepository";
pub const EVALUATION_REPOSITORY: &str = "evaluationRepository";
pub const GRADE_REPOSITORY: &str = "gradeRepository";
pub const RANKING_REPOSITORY: &str = "rankingRepository";

pub const AUTH_SERVICE: &str = "authService";
pub const COURSE_SERVICE: &str = "courseService";
pub const STUDENT_SERVICE: &str = "studentService";
pub const GROUP_SERVICE: &str = "groupService";
pub const ENROLLMENT_SERVICE: &str = "enrollmentService";
pub const ATTENDANCE_SERVICE: &str = "attendanceService";
pub const EVALUATION_SERVICE: &str = "evaluationService";
pub const GRADE_SERVICE: &str = "gradeService";
pub const RANKING_SERVICE: &str = "rankingService";
pub const HEALTH_SERVICE: &str = "healthService";

fn pool(c: &Container) -> Result<PgPool, ContainerError> {
    Ok(c.resolve::<PgPool>(DB)?.as_ref().clone())
}

pub fn register_dependencies(
    container: &mut Container,
    db: PgPool,
    config: Arc<AppConfig>,
) -> Result<(), ContainerError> {
    let started_at = Instant::now();

    container.singleton(DB, move |_| Ok(db.clone()))?;
    let jwt = config.jwt.clone();
    container.singleton(CONFIG, move |_| Ok(config.as_ref().clone()))?;
    container.singleton(JWT_CONFIG, move |_| Ok(jwt.clone()))?;

    container.singleton(USER_REPOSITORY, |c| Ok(UserRepository::new(pool(c)?)))?;
    container.singleton(COURSE_REPOSITORY, |c| Ok(CourseRepository::new(pool(c)?)))?;
    container.singleton(STUDENT_REPOSITORY, |c| Ok(StudentRepository::new(pool(c)?)))?;
    container.singleton(GROUP_REPOSITORY, |c| Ok(GroupRepository::new(pool(c)?)))?;
    container.singleton(ENROLLMENT_REPOSITORY, |c| {
        Ok(EnrollmentRepository::new(pool(c)?))
    })?;
    container.singleton(ATTENDANCE_REPOSITORY, |c| {
        Ok(AttendanceRepository::new(pool(c)?))
    })?;
    container.singleton(EVALUATION_REPOSITORY, |c| {
        Ok(EvaluationRepository::new(pool(c)?))
    })?;
    container.singleton(GRADE_REPOSITORY, |c| Ok(GradeRepository::new(pool(c)?)))?;
    container.singleton(RANKING_REPOSITORY, |c| Ok(RankingRepository::new(pool(c)?)))?;

    container.singleton(AUTH_SERVICE, |c| {
        Ok(AuthService::new(
            c.resolve(USER_REPOSITORY)?,
            c.resolve::<JwtConfig>(JWT_CONFIG)?,
        ))
    })?;
    container.singleton(COURSE_SERVICE, |c| {
        Ok(CourseService::new(c.resolve(COURSE_REPOSITORY)?))
    })?;
    container.singleton(STUDENT_SERVICE, |c| {
        Ok(StudentService::new(c.resolve(STUDENT_REPOSITORY)?))
    })?;
    container.singleton(GROUP_SERVICE, |c| {
        Ok(GroupService::new(
            c.resolve(GROUP_REPOSITORY)?,
            c.resolve(COURSE_REPOSITORY)?,
            c.resolve(USER_REPOSITORY)?,
        ))
    })?;
    container.singleton(ENROLLMENT_SERVICE, |c| {
        Ok(EnrollmentService::new(
            c.resolve(ENROLLMENT_REPOSITORY)?,
            c.resolve(STUDENT_REPOSITORY)?,
        ))
    })?;
    container.singleton(ATTENDANCE_SERVICE, |c| {
        Ok(AttendanceService::new(
            c.resolve(ATTENDANCE_REPOSITORY)?,
            c.resolve(ENROLLMENT_REPOSITORY)?,
        ))
    })?;
    container.singleton(EVALUATION_SERVICE, |c| {
        Ok(EvaluationService::new(c.resolve(EVALUATION_REPOSITORY)?))
    })?;
    container.singleton(GRADE_SERVICE, |c| {
        Ok(GradeService::new(
            c.resolve(GRADE_REPOSITORY)?,
            c.resolve(EVALUATION_REPOSITORY)?,
            c.resolve(ENROLLMENT_REPOSITORY)?,
        ))
    })?;
    container.singleton(RANKING_SERVICE, |c| {
        Ok(RankingService::new(
            c.resolve(RANKING_REPOSITORY)?,
            c.resolve(GROUP_REPOSITORY)?,
        ))
    })?;
    container.singleton(HEALTH_SERVICE, move |c| {
        Ok(HealthService::new(pool(c)?, started_at))
    })?;

    Ok(())
}
