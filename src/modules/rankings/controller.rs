use axum::{Json, extract::State};
use tracing::instrument;

use aula_core::{ApiResponse, AppError, ErrorResponse};
use aula_models::GroupRanking;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::Path;

/// Ranking of a group by weighted average
///
/// Tied averages share a position and the following position is skipped.
#[utoipa::path(
    get,
    path = "/api/v1/rankings/groups/{group_id}",
    params(("group_id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group standings", body = ApiResponse<GroupRanking>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Rankings"
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_group_ranking(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(group_id): Path<i32>,
) -> Result<Json<ApiResponse<GroupRanking>>, AppError> {
    let ranking = state.rankings.for_group(group_id).await?;
    Ok(Json(ApiResponse::ok(ranking)))
}
