use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{
    AttendanceFilterParams, AttendanceRecord, CreateAttendanceDto, UpdateAttendanceDto,
};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(PaginationParams, AttendanceFilterParams),
    responses(
        (status = 200, description = "Paginated attendance records", body = ApiResponse<Vec<AttendanceRecord>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn list_attendance(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<AttendanceFilterParams>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, AppError> {
    let (records, meta) = state.attendance.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(records, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/attendance/{id}",
    params(("id" = i32, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = ApiResponse<AttendanceRecord>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, AppError> {
    let record = state.attendance.get(id).await?;
    Ok(Json(ApiResponse::ok(record)))
}

#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = ApiResponse<AttendanceRecord>),
        (status = 400, description = "Enrollment is withdrawn", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse),
        (status = 409, description = "Already recorded for this date", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth_user, dto), fields(usuario_id = auth_user.usuario_id()))]
pub async fn create_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceRecord>>), AppError> {
    let record = state
        .attendance
        .create(dto, auth_user.usuario_id())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record))))
}

#[utoipa::path(
    put,
    path = "/api/v1/attendance/{id}",
    params(("id" = i32, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance record updated", body = ApiResponse<AttendanceRecord>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth_user, dto), fields(usuario_id = auth_user.usuario_id()))]
pub async fn update_attendance(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, AppError> {
    let record = state
        .attendance
        .update(id, dto, auth_user.usuario_id())
        .await?;
    Ok(Json(ApiResponse::ok(record)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{id}",
    params(("id" = i32, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.attendance.delete(id).await?;
    Ok(Json(MessageResponse::new("Attendance record deleted successfully")))
}
