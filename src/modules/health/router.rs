use axum::{Router, routing::get};

use super::controller::{health, live, ready};
use crate::state::AppState;

/// Mounted at `/health`, outside `/api` and without authentication.
pub fn init_health_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/live", get(live))
        .route("/ready", get(ready))
}
