use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse, MessageResponse, PaginationParams};
use aula_models::{CreateEvaluationDto, Evaluation, EvaluationFilterParams, UpdateEvaluationDto};

use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireStaff;
use crate::state::AppState;
use crate::validator::{Path, Query, ValidatedJson};

#[utoipa::path(
    get,
    path = "/api/v1/evaluations",
    params(PaginationParams, EvaluationFilterParams),
    responses(
        (status = 200, description = "Paginated list of evaluations", body = ApiResponse<Vec<Evaluation>>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_evaluations(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
    Query(filters): Query<EvaluationFilterParams>,
) -> Result<Json<ApiResponse<Vec<Evaluation>>>, AppError> {
    let (evaluations, meta) = state.evaluations.list(&params, &filters).await?;
    Ok(Json(ApiResponse::paginated(evaluations, meta)))
}

#[utoipa::path(
    get,
    path = "/api/v1/evaluations/{id}",
    params(("id" = i32, Path, description = "Evaluation ID")),
    responses(
        (status = 200, description = "Evaluation details", body = ApiResponse<Evaluation>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_evaluation(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Evaluation>>, AppError> {
    let evaluation = state.evaluations.get(id).await?;
    Ok(Json(ApiResponse::ok(evaluation)))
}

#[utoipa::path(
    post,
    path = "/api/v1/evaluations",
    request_body = CreateEvaluationDto,
    responses(
        (status = 201, description = "Evaluation created", body = ApiResponse<Evaluation>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse),
        (status = 409, description = "Total weight of the group would exceed 100", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _staff, dto))]
pub async fn create_evaluation(
    State(state): State<AppState>,
    _staff: RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateEvaluationDto>,
) -> Result<(StatusCode, Json<ApiResponse<Evaluation>>), AppError> {
    let evaluation = state.evaluations.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(evaluation))))
}

#[utoipa::path(
    put,
    path = "/api/v1/evaluations/{id}",
    params(("id" = i32, Path, description = "Evaluation ID")),
    request_body = UpdateEvaluationDto,
    responses(
        (status = 200, description = "Evaluation updated", body = ApiResponse<Evaluation>),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse),
        (status = 409, description = "Total weight of the group would exceed 100", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _staff, dto))]
pub async fn update_evaluation(
    State(state): State<AppState>,
    _staff: RequireStaff,
    Path(id): Path<i32>,
    ValidatedJson(dto): ValidatedJson<UpdateEvaluationDto>,
) -> Result<Json<ApiResponse<Evaluation>>, AppError> {
    let evaluation = state.evaluations.update(id, dto).await?;
    Ok(Json(ApiResponse::ok(evaluation)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/evaluations/{id}",
    params(("id" = i32, Path, description = "Evaluation ID")),
    responses(
        (status = 200, description = "Evaluation deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin or docente only", body = ErrorResponse),
        (status = 404, description = "Evaluation not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Evaluations"
)]
#[instrument(skip(state, _staff))]
pub async fn delete_evaluation(
    State(state): State<AppState>,
    _staff: RequireStaff,
    Path(id): Path<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    state.evaluations.delete(id).await?;
    Ok(Json(MessageResponse::new("Evaluation deleted successfully")))
}
