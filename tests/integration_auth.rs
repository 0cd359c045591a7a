mod common;

use aula::aula_auth::Rol;
use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{TEST_PASSWORD, app_with_pool, create_user, send, unique_email};

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let email = unique_email();
    let user_id = create_user(&pool, &email, Rol::Docente).await;
    let app = app_with_pool(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["access_token"].is_string());
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 3600);
    assert_eq!(body["data"]["user"]["id"], user_id);
    assert_eq!(body["data"]["user"]["role"], "docente");
    assert!(body["data"]["user"].get("password").is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_email_is_case_insensitive(pool: PgPool) {
    let email = unique_email();
    create_user(&pool, &email, Rol::Admin).await;
    let app = app_with_pool(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email.to_uppercase(), "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let email = unique_email();
    create_user(&pool, &email, Rol::Estudiante).await;
    let app = app_with_pool(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrongpassword" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_INVALID_CREDENTIALS");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email_matches_wrong_password(pool: PgPool) {
    let app = app_with_pool(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "nobody@aula.edu", "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_INVALID_CREDENTIALS");
    assert_eq!(body["error"]["message"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_validation(pool: PgPool) {
    let app = app_with_pool(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": "not-an-email", "password": "" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["details"]["email"].is_array());
    assert!(body["error"]["details"]["password"].is_array());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_from_login_authenticates_me(pool: PgPool) {
    let email = unique_email();
    let user_id = create_user(&pool, &email, Rol::Estudiante).await;
    let app = app_with_pool(pool);

    let (_, login) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": TEST_PASSWORD })),
    )
    .await;
    let token = login["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/v1/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["principal"]["usuarioId"], user_id);
    assert_eq!(body["data"]["principal"]["rol"], "estudiante");
    assert_eq!(body["data"]["user"]["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_me_requires_token(pool: PgPool) {
    let app = app_with_pool(pool);
    let (status, body) = send(&app, "GET", "/api/v1/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_TOKEN_REQUIRED");
}
