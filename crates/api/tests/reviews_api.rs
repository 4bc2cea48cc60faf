//! HTTP-level integration tests for review submission and moderation.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{build_test_app, expect_status, get, post_json, token_for};
use serde_json::json;
use sqlx::PgPool;

use ausverity_core::roles::ROLE_ADMIN;
use ausverity_db::models::user::CreateUser;
use ausverity_db::repositories::{LawyerRepo, UserRepo};

async fn register(app: &Router, email: &str, role: &str, name: &str) -> (String, i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        None,
        json!({
            "email": email,
            "password": "a-long-enough-password",
            "full_name": name,
            "role": role,
            "profile_name": name,
        }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

async fn admin_token(pool: &PgPool) -> String {
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            email: "admin@ausverity.example".into(),
            password_hash: "argon2-hash-placeholder".into(),
            full_name: "Admin".into(),
            role: ROLE_ADMIN.into(),
        },
    )
    .await
    .unwrap();
    token_for(&admin)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_lifecycle_submit_moderate_respond(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (lawyer_token, lawyer_user_id) =
        register(&app, "jane@example.com", "lawyer", "Jane Doe").await;
    let (client_token, _) = register(&app, "client@example.com", "client", "A Client").await;
    let admin_token = admin_token(&pool).await;
    let lawyer = LawyerRepo::find_by_user_id(&pool, lawyer_user_id)
        .await
        .unwrap()
        .unwrap();

    // Client submits.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        Some(&client_token),
        json!({"rating": 5, "comment": "Handled my matter with great care."}),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let review_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "pending");

    // Pending reviews are not public.
    let response = get(
        app.clone(),
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        None,
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // Admin approves; the review becomes public and rated.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/admin/reviews/{review_id}/approve"),
        Some(&admin_token),
        json!({}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let response = get(app.clone(), "/api/v1/lawyers/by-slug/jane-doe", None).await;
    // Profile is still draft, so the public page 404s; check the list
    // endpoint instead.
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(
        app.clone(),
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        None,
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The lawyer responds once.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/reviews/{review_id}/respond"),
        Some(&lawyer_token),
        json!({"response": "Thank you for the kind words."}),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["response"], "Thank you for the kind words.");

    let response = post_json(
        app,
        &format!("/api/v1/reviews/{review_id}/respond"),
        Some(&lawyer_token),
        json!({"response": "A second reply should not land."}),
    )
    .await;
    let body = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["code"], "INVALID_STATE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_validation_floors(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, lawyer_user_id) = register(&app, "jane@example.com", "lawyer", "Jane Doe").await;
    let (client_token, _) = register(&app, "client@example.com", "client", "A Client").await;
    let lawyer = LawyerRepo::find_by_user_id(&pool, lawyer_user_id)
        .await
        .unwrap()
        .unwrap();

    // Rating out of range.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        Some(&client_token),
        json!({"rating": 6, "comment": "Handled my matter with great care."}),
    )
    .await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Comment too short.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        Some(&client_token),
        json!({"rating": 4, "comment": "ok"}),
    )
    .await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Lawyers cannot submit reviews at all.
    let (other_lawyer_token, _) =
        register(&app, "john@example.com", "lawyer", "John Roe").await;
    let response = post_json(
        app,
        &format!("/api/v1/lawyers/{}/reviews", lawyer.id),
        Some(&other_lawyer_token),
        json!({"rating": 4, "comment": "Handled my matter with great care."}),
    )
    .await;
    let body = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body["code"], "FORBIDDEN");
}
