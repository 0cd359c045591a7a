use axum::{Router, middleware, routing::get};

use super::controller::{create_grade, delete_grade, get_grade, list_grades, update_grade};
use crate::middleware::role::require_staff;
use crate::state::AppState;

/// Students read their own grades through `/students/{id}/grades`.
pub fn init_grades_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_grades).post(create_grade))
        .route(
            "/{id}",
            get(get_grade).put(update_grade).delete(delete_grade),
        )
        .route_layer(middleware::from_fn(require_staff))
}
