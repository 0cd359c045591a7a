use axum::{Router, middleware, routing::get};

use super::controller::{
    create_enrollment, delete_enrollment, get_enrollment, list_enrollments, update_enrollment,
};
use crate::middleware::role::require_staff;
use crate::state::AppState;

/// Staff only; writes are further restricted to admins by their handlers.
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_enrollments).post(create_enrollment))
        .route(
            "/{id}",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
        .route_layer(middleware::from_fn(require_staff))
}
