use axum::{Router, routing::get};

use super::controller::get_group_ranking;
use crate::state::AppState;

pub fn init_rankings_router() -> Router<AppState> {
    Router::new().route("/groups/{group_id}", get(get_group_ranking))
}
