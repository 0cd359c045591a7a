use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, me};
use crate::state::AppState;

/// `/login` is public; `/me` authenticates through the `AuthUser` extractor.
pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
