use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use aula_auth::{Claims, Rol};
use aula_core::{ErrorBody, ErrorCode, ErrorResponse, MessageResponse, PaginationMeta};
use aula_models::{
    AttendanceRecord, AttendanceStatus, Course, CreateAttendanceDto, CreateCourseDto,
    CreateEnrollmentDto, CreateEvaluationDto, CreateGradeDto, CreateGroupDto, CreateStudentDto,
    Enrollment, EnrollmentStatus, Evaluation, Grade, Group, GroupRanking, LoginRequest,
    LoginResponse, MeResponse, RankingEntry, Student, UpdateAttendanceDto, UpdateCourseDto,
    UpdateEnrollmentDto, UpdateEvaluationDto, UpdateGradeDto, UpdateGroupDto, UpdateStudentDto,
    User,
};

use crate::modules::health::model::{
    DatabaseCheck, HealthChecks, HealthResponse, LivenessResponse, MemoryCheck, ProcessCheck,
    ReadinessResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::me,
        crate::modules::courses::controller::list_courses,
        crate::modules::courses::controller::get_course,
        crate::modules::courses::controller::create_course,
        crate::modules::courses::controller::update_course,
        crate::modules::courses::controller::delete_course,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::list_student_enrollments,
        crate::modules::students::controller::list_student_grades,
        crate::modules::students::controller::list_student_attendance,
        crate::modules::groups::controller::list_groups,
        crate::modules::groups::controller::get_group,
        crate::modules::groups::controller::create_group,
        crate::modules::groups::controller::update_group,
        crate::modules::groups::controller::delete_group,
        crate::modules::groups::controller::list_group_enrollments,
        crate::modules::enrollments::controller::list_enrollments,
        crate::modules::enrollments::controller::get_enrollment,
        crate::modules::enrollments::controller::create_enrollment,
        crate::modules::enrollments::controller::update_enrollment,
        crate::modules::enrollments::controller::delete_enrollment,
        crate::modules::attendance::controller::list_attendance,
        crate::modules::attendance::controller::get_attendance,
        crate::modules::attendance::controller::create_attendance,
        crate::modules::attendance::controller::update_attendance,
        crate::modules::attendance::controller::delete_attendance,
        crate::modules::evaluations::controller::list_evaluations,
        crate::modules::evaluations::controller::get_evaluation,
        crate::modules::evaluations::controller::create_evaluation,
        crate::modules::evaluations::controller::update_evaluation,
        crate::modules::evaluations::controller::delete_evaluation,
        crate::modules::grades::controller::list_grades,
        crate::modules::grades::controller::get_grade,
        crate::modules::grades::controller::create_grade,
        crate::modules::grades::controller::update_grade,
        crate::modules::grades::controller::delete_grade,
        crate::modules::rankings::controller::get_group_ranking,
        crate::modules::health::controller::live,
        crate::modules::health::controller::ready,
        crate::modules::health::controller::health,
    ),
    components(
        schemas(
            Claims,
            Rol,
            ErrorCode,
            ErrorBody,
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            User,
            LoginRequest,
            LoginResponse,
            MeResponse,
            Course,
            CreateCourseDto,
            UpdateCourseDto,
            Student,
            CreateStudentDto,
            UpdateStudentDto,
            Group,
            CreateGroupDto,
            UpdateGroupDto,
            Enrollment,
            EnrollmentStatus,
            CreateEnrollmentDto,
            UpdateEnrollmentDto,
            AttendanceRecord,
            AttendanceStatus,
            CreateAttendanceDto,
            UpdateAttendanceDto,
            Evaluation,
            CreateEvaluationDto,
            UpdateEvaluationDto,
            Grade,
            CreateGradeDto,
            UpdateGradeDto,
            GroupRanking,
            RankingEntry,
            LivenessResponse,
            ReadinessResponse,
            HealthResponse,
            HealthChecks,
            DatabaseCheck,
            MemoryCheck,
            ProcessCheck,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login and the caller's profile"),
        (name = "Courses", description = "Course catalog"),
        (name = "Students", description = "Student profiles and their records"),
        (name = "Groups", description = "Course groups per period"),
        (name = "Enrollments", description = "Student membership in groups"),
        (name = "Attendance", description = "Attendance per session"),
        (name = "Evaluations", description = "Weighted evaluations of a group"),
        (name = "Grades", description = "Scores per evaluation"),
        (name = "Rankings", description = "Group standings by weighted average"),
        (name = "Health", description = "Liveness, readiness and detailed health")
    ),
    info(
        title = "Aula API",
        version = "0.1.0",
        description = "Academic management REST API built with Rust, Axum and PostgreSQL, with JWT authentication and role-based access.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
