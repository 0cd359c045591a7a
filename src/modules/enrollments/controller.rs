use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{CreateEnrollmentDto, Enrollment, EnrollmentFilterParams, UpdateEnrollmentDto};

use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/enrollments",
    params(PaginationParams, EnrollmentFilterParams),
    responses(
        (status = 200, description = "Paginated list of enrollments", body = ApiResponse<Vec<Enrollment>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn list_enrollments(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<EnrollmentFilterParams>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, AppError> {
    let (enrollments, meta) = state.enrollments.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(enrollments, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/enrollments/{id}",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment details", body = ApiResponse<Enrollment>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Enrollment>>, AppError> {
    let enrollment = state.enrollments.get(id).await?;
    Ok(Json(ApiResponse::ok(enrollment)))
}

#[utoipa::path(
    post,
    path = "/api/v1/enrollments",
    request_body = CreateEnrollmentDto,
    responses(
        (status = 201, description = "Student enrolled", body = ApiResponse<Enrollment>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student or group not found", body = ErrorResponse),
        (status = 409, description = "Already enrolled or group full", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, _admin))]
pub async fn create_enrollment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateEnrollmentDto>,
) -> Result<(StatusCode, Json<ApiResponse<Enrollment>>), AppError> {
    let enrollment = state.enrollments.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(enrollment))))
}

#[utoipa::path(
    put,
    path = "/api/v1/enrollments/{id}",
    params(("id" = i32, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentDto,
    responses(
        (status = 200, description = "Enrollment status updated", body = ApiResponse<Enrollment>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 409, description = "Group full", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, _admin))]
pub async fn update_enrollment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateEnrollmentDto>,
) -> Result<Json<ApiResponse<Enrollment>>, AppError> {
    let enrollment = state.enrollments.update(id, dto).await?;
    Ok(Json(ApiResponse::ok(enrollment)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/enrollments/{id}",
    params(("id" = i32, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Enrollments"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_enrollment(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.enrollments.delete(id).await?;
    Ok(Json(MessageResponse::new("Enrollment deleted successfully")))
}
