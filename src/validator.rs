//! Request extractors that reject with the JSON error envelope.
//!
//! Malformed bodies are `BAD_REQUEST`; bodies that parse but break a rule are
//! `VALIDATION_ERROR` (422) with the failing messages grouped by field in
//! `details`. Unparseable path segments and query strings are `BAD_REQUEST`.

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{Validate, ValidationErrors};

use aula_core::AppError;

fn field_messages(errors: &ValidationErrors) -> Map<String, Value> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
                .map(Value::String)
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect()
}

fn format_errors(fields: &Map<String, Value>) -> String {
    let mut messages: Vec<&str> = fields
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .collect();
    messages.sort_unstable();
    messages.join(", ")
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    if matches!(rejection, JsonRejection::MissingJsonContentType(_)) {
        return AppError::bad_request("Missing 'Content-Type: application/json' header");
    }

    let error_msg = rejection.body_text();

    if error_msg.contains("missing field") {
        let field = error_msg
            .split("missing field `")
            .nth(1)
            .and_then(|s| s.split('`').next())
            .unwrap_or("unknown");
        return AppError::bad_request(format!("{} is required", field));
    }

    if error_msg.contains("invalid type") || error_msg.contains("unknown variant") {
        return AppError::bad_request("Invalid field type in request");
    }

    AppError::bad_request("Invalid request body")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_error)?;

        value.validate().map_err(|errors| {
            let fields = field_messages(&errors);
            AppError::unprocessable(format_errors(&fields)).with_details(Value::Object(fields))
        })?;

        Ok(ValidatedJson(value))
    }
}

/// `axum::extract::Path` with an envelope rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match axum::extract::Path::<T>::from_request_parts(parts, state).await {
            Ok(axum::extract::Path(value)) => Ok(Path(value)),
            Err(PathRejection::FailedToDeserializePathParams(err)) => {
                Err(AppError::bad_request(err.body_text()))
            }
            Err(rejection) => Err(AppError::internal_error(rejection.body_text())),
        }
    }
}

/// `axum::extract::Query` with an envelope rejection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map(|axum::extract::Query(value)| Query(value))
            .map_err(|rejection: QueryRejection| AppError::bad_request(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::ErrorCode;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct Payload {
        #[validate(length(min = 3, message = "name is too short"))]
        name: String,
        #[validate(range(min = 1, max = 10))]
        size: i32,
    }

    fn request(body: &str, content_type: Option<&str>) -> Request {
        let mut builder = HttpRequest::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn extract(body: &str) -> Result<Payload, AppError> {
        ValidatedJson::<Payload>::from_request(request(body, Some("application/json")), &())
            .await
            .map(|ValidatedJson(p)| p)
    }

    #[tokio::test]
    async fn test_valid_body_passes() {
        let payload = extract(r#"{"name":"Algebra","size":4}"#).await.unwrap();
        assert_eq!(payload.name, "Algebra");
        assert_eq!(payload.size, 4);
    }

    #[tokio::test]
    async fn test_rule_violation_is_validation_error_with_details() {
        let err = extract(r#"{"name":"Al","size":40}"#).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let details = err.details.unwrap();
        assert_eq!(details["name"][0], "name is too short");
        assert_eq!(details["size"][0], "size is invalid");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let err = extract(r#"{"size":4}"#).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert_eq!(err.message, "name is required");
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let err = ValidatedJson::<Payload>::from_request(request("{}", None), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
    }

    #[derive(Debug, Deserialize)]
    struct Filters {
        status: Option<Status>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Active,
    }

    fn parts(uri: &str) -> Parts {
        let (parts, _) = HttpRequest::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_query_parses_known_values() {
        let Query(filters) =
            Query::<Filters>::from_request_parts(&mut parts("/?status=active"), &())
                .await
                .unwrap();
        assert_eq!(filters.status, Some(Status::Active));
    }

    #[tokio::test]
    async fn test_unknown_query_value_is_bad_request() {
        let err = Query::<Filters>::from_request_parts(&mut parts("/?status=bogus"), &())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::BadRequest);
        assert!(err.message.contains("bogus"));
    }
}
