use axum::{Router, middleware, routing::get};

use super::controller::{
    create_attendance, delete_attendance, get_attendance, list_attendance, update_attendance,
};
use crate::middleware::role::require_staff;
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_attendance).post(create_attendance))
        .route(
            "/{id}",
            get(get_attendance)
                .put(update_attendance)
                .delete(delete_attendance),
        )
        .route_layer(middleware::from_fn(require_staff))
}
