use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{
    CreateGroupDto, Enrollment, EnrollmentFilterParams, Group, GroupFilterParams, UpdateGroupDto,
};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/groups",
    params(PaginationParams, GroupFilterParams),
    responses(
        (status = 200, description = "Paginated list of groups", body = ApiResponse<Vec<Group>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_groups(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<GroupFilterParams>,
) -> Result<Json<ApiResponse<Vec<Group>>>, AppError> {
    let (groups, meta) = state.groups.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(groups, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = ApiResponse<Group>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_group(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Group>>, AppError> {
    let group = state.groups.get(id).await?;
    Ok(Json(ApiResponse::ok(group)))
}

#[utoipa::path(
    post,
    path = "/api/v1/groups",
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = ApiResponse<Group>),
        (status = 400, description = "teacher_id is not a docente", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Course or teacher not found", body = ErrorResponse),
        (status = 409, description = "Group already exists for the course and period", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_group(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<ApiResponse<Group>>), AppError> {
    let group = state.groups.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group))))
}

#[utoipa::path(
    put,
    path = "/api/v1/groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    request_body = UpdateGroupDto,
    responses(
        (status = 200, description = "Group updated", body = ApiResponse<Group>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Capacity below active enrollments", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_group(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<ApiResponse<Group>>, AppError> {
    let group = state.groups.update(id, dto).await?;
    Ok(Json(ApiResponse::ok(group)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/groups/{id}",
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _admin))]
pub async fn delete_group(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.groups.delete(id).await?;
    Ok(Json(MessageResponse::new("Group deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/v1/groups/{id}/enrollments",
    params(("id" = i32, Path, description = "Group ID"), PaginationParams),
    responses(
        (status = 200, description = "Roster of the group", body = ApiResponse<Vec<Enrollment>>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _staff))]
pub async fn list_group_enrollments(
    State(state): State<AppState>,
    _staff: RequireStaff,
    Path(id): Path<i32>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ApiResponse<Vec<Enrollment>>>, AppError> {
    let group = state.groups.get(id).await?;

    let filters = EnrollmentFilterParams {
        group_id: Some(group.id),
        ..Default::default()
    };
    let (enrollments, meta) = state.enrollments.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(enrollments, meta)))
}
