use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use aula_config::CorsConfig;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::middleware::error::{handle_panic, route_not_found};
use crate::middleware::rate_limit::{build_rate_limiter, rate_limit, spawn_cleanup};
use crate::modules::attendance::router::init_attendance_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::evaluations::router::init_evaluations_router;
use crate::modules::grades::router::init_grades_router;
use crate::modules::groups::router::init_groups_router;
use crate::modules::health::router::init_health_router;
use crate::modules::rankings::router::init_rankings_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Every resource router; all of them require an authenticated principal.
///
/// `route_layer` only wraps matched routes, so a known path with an
/// unsupported method reaches the `ROUTE_NOT_FOUND` fallback without
/// authentication.
fn protected_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/courses", init_courses_router())
        .nest("/students", init_students_router())
        .nest("/groups", init_groups_router())
        .nest("/enrollments", init_enrollments_router())
        .nest("/attendance", init_attendance_router())
        .nest("/evaluations", init_evaluations_router())
        .nest("/grades", init_grades_router())
        .nest("/rankings", init_rankings_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}

fn api_router(state: &AppState) -> Router<AppState> {
    let api = Router::new()
        .nest("/auth", init_auth_router())
        .merge(protected_router(state));

    match build_rate_limiter(&state.config.rate_limit) {
        Some(limiter) => {
            spawn_cleanup(limiter.clone());
            api.layer(middleware::from_fn_with_state(limiter, rate_limit))
        }
        None => api,
    }
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/health", init_health_router())
        .nest(API_PREFIX, api_router(&state))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.config.cors))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
