use axum::{Router, routing::get};

use super::controller::{
    create_group, delete_group, get_group, list_group_enrollments, list_groups, update_group,
};
use crate::state::AppState;

pub fn init_groups_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route(
            "/{id}",
            get(get_group).put(update_group).delete(delete_group),
        )
        .route("/{id}/enrollments", get(list_group_enrollments))
}
