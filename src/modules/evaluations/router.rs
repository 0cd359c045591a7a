use axum::{Router, routing::get};

use super::controller::{
    create_evaluation, delete_evaluation, get_evaluation, list_evaluations, update_evaluation,
};
use crate::state::AppState;

pub fn init_evaluations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_evaluations).post(create_evaluation))
        .route(
            "/{id}",
            get(get_evaluation)
                .put(update_evaluation)
                .delete(delete_evaluation),
        )
}
