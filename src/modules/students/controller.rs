use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{
    AttendanceFilterParams, AttendanceRecord, CreateStudentDto, Enrollment,
    EnrollmentFilterParams, Grade, GradeFilterParams, Student, StudentFilterParams,
    UpdateStudentDto,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::ownership::{Access, authorize_owner_or_roles};
use crate::middleware::role::{RequireAdmin, RequireStaff, STAFF};
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

/// Staff may read any student; an `estudiante` only their own profile.
async fn authorize_student(
    state: &AppState,
    auth_user: &AuthUser,
    id: i32,
) -> Result<Access<Student>, AppError> {
    authorize_owner_or_roles(Some(auth_user.claims()), STAFF, || state.students.find(id)).await
}

/// Runs the ownership check and makes sure the student exists.
async fn require_student_access(
    state: &AppState,
    auth_user: &AuthUser,
    id: i32,
) -> Result<Student, AppError> {
    authorize_student(state, auth_user, id)
        .await?
        .into_resource(|| state.students.get(id))
        .await
}

#[utoipa::path(
    get,
    path = "/api/v1/students",
    params(PaginationParams, StudentFilterParams),
    responses(
        (status = 200, description = "Paginated list of students", body = ApiResponse<Vec<Student>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _staff))]
pub async fn list_students(
    State(state): State<AppState>,
    _staff: RequireStaff,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<StudentFilterParams>,
) -> Result<Json<ApiResponse<Vec<Student>>>, AppError> {
    let (students, meta) = state.students.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(students, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = ApiResponse<Student>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - not the owner", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user), fields(usuario_id = auth_user.usuario_id()))]
pub async fn get_student(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = require_student_access(&state, &auth_user, id).await?;
    Ok(Json(ApiResponse::ok(student)))
}

#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student and user account created", body = ApiResponse<Student>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 409, description = "Email or student code already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), AppError> {
    let student = state.students.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(student))))
}

#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = ApiResponse<Student>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Email or student code already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = state.students.update(id, dto).await?;
    Ok(Json(ApiResponse::ok(student)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_student(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.students.delete(id).await?;
    Ok(Json(MessageResponse::new("Student deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/enrollments",
    params(("id" = i32, Path, description = "Student ID"), PaginationParams),
    responses(
        (status = 200, description = "Enrollments of the student", body = ApiResponse<Vec<Enrollment>>),
        (status = 403, description = "Forbidden - not the owner", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user))]
pub async fn list_student_enrollments(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, AppError> {
    let student = require_student_access(&state, &auth_user, id).await?;

    let filters = EnrollmentFilterParams {
        student_id: Some(student.id),
        ..Default::default()
    };
    let (enrollments, meta) = state.enrollments.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(enrollments, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/grades",
    params(("id" = i32, Path, description = "Student ID"), PaginationParams),
    responses(
        (status = 200, description = "Grades of the student", body = ApiResponse<Vec<Grade>>),
        (status = 403, description = "Forbidden - not the owner", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user))]
pub async fn list_student_grades(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Grade>>>, AppError> {
    let student = require_student_access(&state, &auth_user, id).await?;

    let filters = GradeFilterParams {
        student_id: Some(student.id),
        ..Default::default()
    };
    let (grades, meta) = state.grades.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(grades, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/students/{id}/attendance",
    params(("id" = i32, Path, description = "Student ID"), PaginationParams),
    responses(
        (status = 200, description = "Attendance of the student", body = ApiResponse<Vec<AttendanceRecord>>),
        (status = 403, description = "Forbidden - not the owner", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, auth_user))]
pub async fn list_student_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, AppError> {
    let student = require_student_access(&state, &auth_user, id).await?;

    let filters = AttendanceFilterParams {
        student_id: Some(student.id),
        ..Default::default()
    };
    let (records, meta) = state.attendance.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(records, meta)))
}
