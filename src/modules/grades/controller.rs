use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{CreateGradeDto, Grade, GradeFilterParams, UpdateGradeDto};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/grades",
    params(PaginationParams, GradeFilterParams),
    responses(
        (status = 200, description = "Paginated list of grades", body = ApiResponse<Vec<Grade>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn list_grades(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<GradeFilterParams>,
) -> Result<Json<ApiResponse<Vec<Grade>>>, AppError> {
    let (grades, meta) = state.grades.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(grades, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade details", body = ApiResponse<Grade>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn get_grade(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Grade>>, AppError> {
    let grade = state.grades.get(id).await?;
    Ok(Json(ApiResponse::ok(grade)))
}

#[utoipa::path(
    post,
    path = "/api/v1/grades",
    request_body = CreateGradeDto,
    responses(
        (status = 201, description = "Grade recorded", body = ApiResponse<Grade>),
        (status = 400, description = "Student not enrolled in the evaluation's group", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse),
        (status = 409, description = "Grade already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth_user, dto), fields(usuario_id = auth_user.usuario_id()))]
pub async fn create_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateGradeDto>,
) -> Result<(StatusCode, Json<ApiResponse<Grade>>), AppError> {
    let grade = state.grades.create(dto, auth_user.usuario_id()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(grade))))
}

#[utoipa::path(
    put,
    path = "/api/v1/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    request_body = UpdateGradeDto,
    responses(
        (status = 200, description = "Grade updated", body = ApiResponse<Grade>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state, auth_user, dto), fields(usuario_id = auth_user.usuario_id()))]
pub async fn update_grade(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateGradeDto>,
) -> Result<Json<ApiResponse<Grade>>, AppError> {
    let grade = state.grades.update(id, dto, auth_user.usuario_id()).await?;
    Ok(Json(ApiResponse::ok(grade)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Grade not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Grades"
)]
#[instrument(skip(state))]
pub async fn delete_grade(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.grades.delete(id).await?;
    Ok(Json(MessageResponse::new("Grade deleted successfully")))
}
