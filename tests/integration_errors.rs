mod common;

use aula::aula_auth::Rol;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{offline_app, send, token_for};

async fn get_with_authorization(uri: &str, authorization: &str) -> (StatusCode, Value) {
    let app = offline_app();
    let request = Request::builder()
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let app = offline_app();
    let (status, body) = send(&app, "GET", "/api/v1/courses", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "AUTH_TOKEN_REQUIRED");
}

#[tokio::test]
async fn test_malformed_authorization_headers_are_invalid() {
    for header in ["Token abc", "Bearer", "Bearer ", "bearer"] {
        let (status, body) = get_with_authorization("/api/v1/courses", header).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", header);
        assert_eq!(body["error"]["code"], "AUTH_TOKEN_INVALID", "header {:?}", header);
    }
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let (status, body) =
        get_with_authorization("/api/v1/courses", "Bearer not.a.jwt").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_TOKEN_INVALID");
}

#[tokio::test]
async fn test_unknown_route_returns_envelope_with_details() {
    let app = offline_app();
    let (status, body) = send(&app, "GET", "/api/v1/non-existent-endpoint", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
    assert_eq!(body["error"]["details"]["method"], "GET");
    assert_eq!(
        body["error"]["details"]["path"],
        "/api/v1/non-existent-endpoint"
    );
}

#[tokio::test]
async fn test_unsupported_method_falls_through_before_auth() {
    let app = offline_app();
    let (status, body) = send(&app, "DELETE", "/api/v1/courses", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
    assert_eq!(body["error"]["details"]["method"], "DELETE");
}

#[tokio::test]
async fn test_unparseable_path_id_is_bad_request_envelope() {
    let app = offline_app();
    let token = token_for(1, Rol::Admin);

    for uri in ["/api/v1/students/abc", "/api/v1/students/99999999999"] {
        let (status, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body["success"], false, "uri {}", uri);
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "uri {}", uri);
    }
}

#[tokio::test]
async fn test_unparseable_query_is_bad_request_envelope() {
    let app = offline_app();
    let token = token_for(1, Rol::Admin);

    for uri in ["/api/v1/enrollments?status=bogus", "/api/v1/courses?limit=abc"] {
        let (status, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body["success"], false, "uri {}", uri);
        assert_eq!(body["error"]["code"], "BAD_REQUEST", "uri {}", uri);
    }
}

#[tokio::test]
async fn test_estudiante_cannot_create_course() {
    let app = offline_app();
    let token = token_for(1, Rol::Estudiante);
    let payload = json!({ "code": "MAT101", "name": "Algebra", "credits": 4 });

    let (status, body) = send(&app, "POST", "/api/v1/courses", Some(&token), Some(payload)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_docente_cannot_create_course() {
    let app = offline_app();
    let token = token_for(2, Rol::Docente);
    let payload = json!({ "code": "MAT101", "name": "Algebra", "credits": 4 });

    let (status, _) = send(&app, "POST", "/api/v1/courses", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_estudiante_is_kept_out_of_staff_routers() {
    let app = offline_app();
    let token = token_for(1, Rol::Estudiante);

    for uri in ["/api/v1/enrollments", "/api/v1/attendance", "/api/v1/grades"] {
        let (status, body) = send(&app, "GET", uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["error"]["code"], "FORBIDDEN", "{}", uri);
    }
}

#[tokio::test]
async fn test_estudiante_cannot_list_students() {
    let app = offline_app();
    let token = token_for(1, Rol::Estudiante);

    let (status, _) = send(&app, "GET", "/api/v1/students", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ownership_lookup_failure_is_forbidden() {
    // The database is unreachable, so the ownership lookup itself fails.
    let app = offline_app();
    let token = token_for(1, Rol::Estudiante);

    let (status, body) = send(&app, "GET", "/api/v1/students/1", Some(&token), None).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_validation_runs_after_role_gate() {
    let app = offline_app();
    let token = token_for(1, Rol::Admin);
    let payload = json!({ "code": "", "name": "Algebra", "credits": 0 });

    let (status, body) = send(&app, "POST", "/api/v1/courses", Some(&token), Some(payload)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["code"].is_array());
    assert!(body["error"]["details"]["credits"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = offline_app();
    let token = token_for(1, Rol::Admin);

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/courses")
        .header("authorization", format!("Bearer {}", token))
        .header("content-type", "application/json")
        .body(Body::from("{\"code\": "))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = offline_app();
    let request = Request::builder()
        .uri("/health/live")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = offline_app();
    let (status, body) = send(&app, "GET", "/api-docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/courses"].is_object());
    assert!(body["paths"]["/api/v1/rankings/groups/{group_id}"].is_object());
}
