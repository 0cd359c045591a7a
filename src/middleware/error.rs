//! Error boundary pieces that sit outside any handler: unmatched routes and
//! panics. Both answer with the standard error envelope.

use std::any::Any;

use axum::{
    extract::OriginalUri,
    http::Method,
    response::{IntoResponse, Response},
};

use aula_core::AppError;

/// Fallback for unknown paths and for known paths with an unsupported method.
pub async fn route_not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::route_not_found(method.as_str(), uri.path())
}

/// Used with `CatchPanicLayer::custom`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal_error(format!("Handler panicked: {}", detail)).into_response()
}
