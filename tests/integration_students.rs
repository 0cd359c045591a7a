mod common;

use aula::aula_auth::Rol;
use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;

use common::{app_with_pool, create_student, create_user, send, token_for, unique_email};

fn student_payload(email: &str, code: &str) -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Torres",
        "email": email,
        "password": "password123",
        "student_code": code,
        "birth_date": "2004-05-17"
    })
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_creates_student_who_can_log_in(pool: PgPool) {
    let admin_id = create_user(&pool, &unique_email(), Rol::Admin).await;
    let app = app_with_pool(pool);
    let admin = token_for(admin_id, Rol::Admin);
    let email = unique_email();

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&admin),
        Some(student_payload(&email, "S-0001")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["student_code"], "S-0001");
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["birth_date"], "2004-05-17");

    let (status, login) = send(
        &app,
        "POST",
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["data"]["user"]["role"], "estudiante");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_student_code_conflicts(pool: PgPool) {
    let admin_id = create_user(&pool, &unique_email(), Rol::Admin).await;
    let app = app_with_pool(pool);
    let admin = token_for(admin_id, Rol::Admin);

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&admin),
        Some(student_payload(&unique_email(), "S-0002")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/students",
        Some(&admin),
        Some(student_payload(&unique_email(), "S-0002")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_reads_only_own_profile(pool: PgPool) {
    let (own_user, own_student) = create_student(&pool, "Ana", "Torres").await;
    let (_, other_student) = create_student(&pool, "Luis", "Vega").await;
    let app = app_with_pool(pool);
    let token = token_for(own_user, Rol::Estudiante);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}", own_student),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], own_student);
    assert_eq!(body["data"]["user_id"], own_user);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}", other_student),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_student_is_forbidden_for_estudiante(pool: PgPool) {
    let (user_id, _) = create_student(&pool, "Ana", "Torres").await;
    let app = app_with_pool(pool);
    let token = token_for(user_id, Rol::Estudiante);

    let (status, _) = send(&app, "GET", "/api/v1/students/999999", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_staff_reads_any_profile(pool: PgPool) {
    let (_, student_id) = create_student(&pool, "Ana", "Torres").await;
    let docente_id = create_user(&pool, &unique_email(), Rol::Docente).await;
    let app = app_with_pool(pool);
    let docente = token_for(docente_id, Rol::Docente);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/students/{}", student_id),
        Some(&docente),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", "/api/v1/students/999999", Some(&docente), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_subresources_follow_ownership(pool: PgPool) {
    let (own_user, own_student) = create_student(&pool, "Ana", "Torres").await;
    let (_, other_student) = create_student(&pool, "Luis", "Vega").await;
    let app = app_with_pool(pool);
    let token = token_for(own_user, Rol::Estudiante);

    for resource in ["enrollments", "grades", "attendance"] {
        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/v1/students/{}/{}", own_student, resource),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", resource);
        assert_eq!(body["data"], json!([]), "{}", resource);
        assert_eq!(body["meta"]["total"], 0, "{}", resource);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/v1/students/{}/{}", other_student, resource),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", resource);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_with_search_and_pagination(pool: PgPool) {
    create_student(&pool, "Ana", "Torres").await;
    create_student(&pool, "Luis", "Vega").await;
    create_student(&pool, "Marta", "Vera").await;
    let docente_id = create_user(&pool, &unique_email(), Rol::Docente).await;
    let app = app_with_pool(pool);
    let docente = token_for(docente_id, Rol::Docente);

    let (status, body) = send(&app, "GET", "/api/v1/students?limit=2", Some(&docente), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["meta"]["total"], 3);
    assert_eq!(body["meta"]["has_more"], true);

    let (_, body) = send(&app, "GET", "/api/v1/students?search=ve", Some(&docente), None).await;
    assert_eq!(body["meta"]["total"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_updates_and_deletes_student(pool: PgPool) {
    let (_, student_id) = create_student(&pool, "Ana", "Torres").await;
    let admin_id = create_user(&pool, &unique_email(), Rol::Admin).await;
    let app = app_with_pool(pool);
    let admin = token_for(admin_id, Rol::Admin);
    let uri = format!("/api/v1/students/{}", student_id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(&admin),
        Some(json!({ "last_name": "Torres Diaz" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["last_name"], "Torres Diaz");
    assert_eq!(body["data"]["first_name"], "Ana");

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
