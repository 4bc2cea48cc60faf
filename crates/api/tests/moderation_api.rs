//! HTTP-level integration tests for the profile moderation workflow.
//!
//! Drives the full submit -> decide cycle through the router: owner
//! registration, draft submission, admin approval/rejection, and the
//! owner-facing preview.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{build_test_app, expect_status, get, post_json, token_for};
use serde_json::json;
use sqlx::PgPool;

use ausverity_core::roles::ROLE_ADMIN;
use ausverity_db::models::user::CreateUser;
use ausverity_db::repositories::{FirmRepo, UserRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register a firm owner through the API; returns (token, firm_id).
async fn register_firm_owner(app: &Router, pool: &PgPool, email: &str, name: &str) -> (String, i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        None,
        json!({
            "email": email,
            "password": "a-long-enough-password",
            "full_name": "Test Owner",
            "role": "firm_owner",
            "profile_name": name,
        }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let token = body["token"].as_str().unwrap().to_string();
    let owner_id = body["user"]["id"].as_i64().unwrap();

    let firm = FirmRepo::find_by_owner(pool, owner_id)
        .await
        .unwrap()
        .expect("registration creates the firm profile");
    (token, firm.id)
}

/// Seed an admin directly (admins cannot self-register) and mint a token.
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submit_approve_publishes_firm(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (owner_token, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;
    let admin_token = admin_token(&pool).await;

    // First submission must complete the contact card.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({
            "email": "office@hartley.example",
            "phone": "02 9000 0000",
            "practice_areas": ["Family", "Wills"],
        }),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let change_id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], "pending");

    // Live firm unchanged until the decision.
    let firm = FirmRepo::find_by_id(&pool, firm_id).await.unwrap().unwrap();
    assert_eq!(firm.email, "");
    assert_eq!(firm.status, "draft");

    // Admin approves.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/admin/changes/{change_id}/decide"),
        Some(&admin_token),
        json!({"action": "approve", "notes": "looks good"}),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["status"], "approved");
    assert_eq!(body["data"]["admin_notes"], "looks good");

    // The merged firm is live and published.
    let firm = FirmRepo::find_by_id(&pool, firm_id).await.unwrap().unwrap();
    assert_eq!(firm.email, "office@hartley.example");
    assert_eq!(firm.status, "published");
    assert_eq!(firm.practice_areas.0, vec!["Family".to_string(), "Wills".to_string()]);

    // And the public page resolves.
    let response = get(app, "/api/v1/firms/by-slug/hartley-associates", None).await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["profile"]["name"], "Hartley & Associates");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_decision_answers_422(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (owner_token, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;
    let admin_token = admin_token(&pool).await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({"email": "office@hartley.example", "phone": "02 9000 0000"}),
    )
    .await;
    let body = expect_status(response, StatusCode::CREATED).await;
    let change_id = body["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/admin/changes/{change_id}/decide"),
        Some(&admin_token),
        json!({"action": "reject"}),
    )
    .await;
    expect_status(response, StatusCode::OK).await;

    let response = post_json(
        app,
        &format!("/api/v1/admin/changes/{change_id}/decide"),
        Some(&admin_token),
        json!({"action": "approve"}),
    )
    .await;
    let body = expect_status(response, StatusCode::UNPROCESSABLE_ENTITY).await;
    assert_eq!(body["code"], "INVALID_STATE");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_submission_without_contact_card_answers_400(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (owner_token, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;

    let response = post_json(
        app,
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({"description": "Boutique family law practice."}),
    )
    .await;
    let body = expect_status(response, StatusCode::BAD_REQUEST).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["error"].as_str().unwrap().contains("email"));

    // Nothing was written.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_changes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_owner_cannot_submit(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (_, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;
    let (other_token, _) =
        register_firm_owner(&app, &pool, "other@firm.example", "Rival Firm").await;

    let response = post_json(
        app,
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&other_token),
        json!({"email": "x@y.com", "phone": "02 9000 0000"}),
    )
    .await;
    let body = expect_status(response, StatusCode::FORBIDDEN).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn preview_merges_open_draft_without_mutating(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (owner_token, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({"email": "office@hartley.example", "phone": "02 9000 0000"}),
    )
    .await;
    expect_status(response, StatusCode::CREATED).await;

    let response = get(
        app,
        &format!("/api/v1/firms/{firm_id}/preview"),
        Some(&owner_token),
    )
    .await;
    let body = expect_status(response, StatusCode::OK).await;
    assert_eq!(body["data"]["has_pending_change"], true);
    // Patched fields override; untouched fields come from the live row.
    assert_eq!(body["data"]["profile"]["email"], "office@hartley.example");
    assert_eq!(body["data"]["profile"]["name"], "Hartley & Associates");

    // The live row is untouched by previewing.
    let firm = FirmRepo::find_by_id(&pool, firm_id).await.unwrap().unwrap();
    assert_eq!(firm.email, "");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resubmission_updates_row_via_http(pool: PgPool) {
    let app = build_test_app(pool.clone());
    let (owner_token, firm_id) =
        register_firm_owner(&app, &pool, "owner@firm.example", "Hartley & Associates").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({"email": "office@hartley.example", "phone": "02 9000 0000"}),
    )
    .await;
    let first = expect_status(response, StatusCode::CREATED).await;

    // Replacement submission answers 200 and reuses the row.
    let response = post_json(
        app,
        &format!("/api/v1/firms/{firm_id}/changes"),
        Some(&owner_token),
        json!({"email": "new@hartley.example", "phone": "02 9000 0000"}),
    )
    .await;
    let second = expect_status(response, StatusCode::OK).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
    assert_eq!(second["data"]["changes"]["email"], "new@hartley.example");
}
