use std::sync::Arc;

use aula_config::AppConfig;
use sqlx::PgPool;

use crate::container::{Container, ContainerError};
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::service::AuthService;
use crate::modules::courses::service::CourseService;
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::evaluations::service::EvaluationService;
use crate::modules::grades::service::GradeService;
use crate::modules::groups::service::GroupService;
use crate::modules::health::service::HealthService;
use crate::modules::rankings::service::RankingService;
use crate::modules::students::service::StudentService;
use crate::registry::{self, register_dependencies};

/// The application context handed to every handler.
///
/// Built once at startup from the [`Container`]; handlers use the typed fields
/// and never resolve services by name.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub auth: Arc<AuthService>,
    pub courses: Arc<CourseService>,
    pub students: Arc<StudentService>,
    pub groups: Arc<GroupService>,
    pub enrollments: Arc<EnrollmentService>,
    pub attendance: Arc<AttendanceService>,
    pub evaluations: Arc<EvaluationService>,
    pub grades: Arc<GradeService>,
    pub rankings: Arc<RankingService>,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// Registers every dependency and resolves each service once, so a wiring
    /// mistake fails here instead of on the first request that needs it.
    pub fn init(db: PgPool, config: AppConfig) -> Result<Self, ContainerError> {
        let mut container = Container::new();
        register_dependencies(&mut container, db, Arc::new(config))?;
        Self::from_container(&container)
    }

    pub fn from_container(c: &Container) -> Result<Self, ContainerError> {
        Ok(Self {
            db: c.resolve::<PgPool>(registry::DB)?.as_ref().clone(),
            config: c.resolve(registry::CONFIG)?,
            auth: c.resolve(registry::AUTH_SERVICE)?,
            courses: c.resolve(registry::COURSE_SERVICE)?,
            students: c.resolve(registry::STUDENT_SERVICE)?,
            groups: c.resolve(registry::GROUP_SERVICE)?,
            enrollments: c.resolve(registry::ENROLLMENT_SERVICE)?,
            attendance: c.resolve(registry::ATTENDANCE_SERVICE)?,
            evaluations: c.resolve(registry::EVALUATION_SERVICE)?,
            grades: c.resolve(registry::GRADE_SERVICE)?,
            rankings: c.resolve(registry::RANKING_SERVICE)?,
            health: c.resolve(registry::HEALTH_SERVICE)?,
        })
    }
}
