//! Application error type and the JSON error envelope.
//!
//! Every failure in the API is expressed as an [`AppError`] carrying a
//! machine-readable [`ErrorCode`], a human-readable message and optional
//! structured details. Converting an `AppError` into a response is the single
//! place where an error kind is mapped to an HTTP status code.
//!
//! # Response Shape
//!
//! ```json
//! {
//!   "success": false,
//!   "error": {
//!     "code": "ROUTE_NOT_FOUND",
//!     "message": "Route GET /api/v1/unknown not found",
//!     "details": { "method": "GET", "path": "/api/v1/unknown" }
//!   }
//! }
//! ```

use std::fmt;

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Machine-readable error codes returned in the error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    AuthTokenRequired,
    AuthTokenInvalid,
    AuthInvalidCredentials,
    Forbidden,
    NotFound,
    RouteNotFound,
    ValidationError,
    BadRequest,
    Conflict,
    RateLimited,
    ServiceUnavailable,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthTokenRequired => "AUTH_TOKEN_REQUIRED",
            ErrorCode::AuthTokenInvalid => "AUTH_TOKEN_INVALID",
            ErrorCode::AuthInvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::RouteNotFound => "ROUTE_NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::RateLimited => "RATE_LIMITED",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for this kind of error.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::AuthTokenRequired
            | ErrorCode::AuthTokenInvalid
            | ErrorCode::AuthInvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound | ErrorCode::RouteNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Server-side failures whose message must not reach the client.
    fn is_opaque(&self) -> bool {
        matches!(self, ErrorCode::DatabaseError | ErrorCode::InternalError)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<Value>,
    pub source: Option<Error>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn token_required() -> Self {
        Self::new(ErrorCode::AuthTokenRequired, "Authentication token is required")
    }

    pub fn token_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthTokenInvalid, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::AuthInvalidCredentials, "Invalid email or password")
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn route_not_found(method: &str, path: &str) -> Self {
        Self::new(
            ErrorCode::RouteNotFound,
            format!("Route {} {} not found", method, path),
        )
        .with_details(json!({ "method": method, "path": path }))
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn rate_limited() -> Self {
        Self::new(
            ErrorCode::RateLimited,
            "Too many requests, please try again later",
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            code: ErrorCode::InternalError,
            message: "Internal server error".to_string(),
            details: None,
            source: Some(err.into()),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow::anyhow!(message.into()))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            code: ErrorCode::DatabaseError,
            message: "A database error occurred".to_string(),
            details: None,
            source: Some(err.into()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {} ({})", self.code, self.message, source),
            None => write!(f, "{}: {}", self.code, self.message),
        }
    }
}

/// Body of the error envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

/// Uniform JSON shape for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: err.code,
                message: err.message.clone(),
                details: err.details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if self.code.is_opaque() {
            match &self.source {
                Some(source) => tracing::error!(code = %self.code, error = ?source, "Request failed"),
                None => tracing::error!(code = %self.code, message = %self.message, "Request failed"),
            }
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::AuthTokenRequired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::AuthTokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ErrorCode::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::ServiceUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_code_serializes_as_screaming_snake_case() {
        let value = serde_json::to_value(ErrorCode::AuthTokenRequired).unwrap();
        assert_eq!(value, "AUTH_TOKEN_REQUIRED");
        assert_eq!(
            serde_json::to_value(ErrorCode::RouteNotFound).unwrap(),
            ErrorCode::RouteNotFound.as_str()
        );
    }

    #[tokio::test]
    async fn test_envelope_shape() {
        let (status, body) = body_json(AppError::token_required()).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "AUTH_TOKEN_REQUIRED");
        assert!(body["error"]["message"].is_string());
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn test_route_not_found_details() {
        let (status, body) =
            body_json(AppError::route_not_found("GET", "/api/v1/non-existent-endpoint")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
        assert_eq!(body["error"]["details"]["method"], "GET");
        assert_eq!(
            body["error"]["details"]["path"],
            "/api/v1/non-existent-endpoint"
        );
    }

    #[tokio::test]
    async fn test_internal_error_hides_source() {
        let err = AppError::internal(anyhow::anyhow!("connection reset by peer"));
        let (status, body) = body_json(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert!(
            !body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("connection reset")
        );
    }

    #[test]
    fn test_question_mark_converts_to_internal() {
        fn parse(input: &str) -> Result<i32, AppError> {
            Ok(input.parse::<i32>()?)
        }

        let err = parse("not-a-number").unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert!(err.source.is_some());
    }
}
