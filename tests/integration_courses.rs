mod common;

use aula::aula_auth::Rol;
use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{app_with_pool, create_user, send, token_for, unique_email};

#[sqlx::test(migrations = "./migrations")]
async fn test_course_crud(pool: PgPool) {
    let admin_id = create_user(&pool, &unique_email(), Rol::Admin).await;
    let app = app_with_pool(pool);
    let admin = token_for(admin_id, Rol::Admin);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/courses",
        Some(&admin),
        Some(json!({ "code": "MAT101", "name": "Algebra", "credits": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    let id = body["data"]["id"].as_i64().unwrap();
    let uri = format!("/api/v1/courses/{}", id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin),
        Some(json!({ "name": "Linear Algebra" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Linear Algebra");
    assert_eq!(body["data"]["code"], "MAT101");
    assert_eq!(body["data"]["credits"], 4);

    let (status, body) = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_course_code_conflicts(pool: PgPool) {
    let admin_id = create_user(&pool, &unique_email(), Rol::Admin).await;
    let app = app_with_pool(pool);
    let admin = token_for(admin_id, Rol::Admin);
    let payload = json!({ "code": "FIS201", "name": "Physics", "credits": 5 });

    let (status, _) =
        send(&app, "POST", "/api/v1/courses", Some(&admin), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v1/courses", Some(&admin), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_any_role_can_read_courses(pool: PgPool) {
    sqlx::query("INSERT INTO courses (code, name, credits) VALUES ('A1', 'Art', 2), ('B2', 'Biology', 3), ('C3', 'Chemistry', 4)")
        .execute(&pool)
        .await
        .unwrap();
    let app = app_with_pool(pool);

    for rol in [Rol::Admin, Rol::Docente, Rol::Estudiante] {
        let token = token_for(1, rol);
        let (status, body) =
            send(&app, "GET", "/api/v1/courses?limit=2&page=2", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
        assert_eq!(body["meta"]["total"], 3);
        assert_eq!(body["meta"]["page"], 2);
        assert_eq!(body["meta"]["total_pages"], 2);
        assert_eq!(body["meta"]["has_more"], false);
    }
}
