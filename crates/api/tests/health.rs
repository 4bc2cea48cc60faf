//! Smoke test for the root health endpoint.

mod common;

use axum::http::StatusCode;
use common::{build_test_app, expect_status, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_returns_ok(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/health", None).await;
    let json = expect_status(response, StatusCode::OK).await;
    assert_eq!(json["status"], "ok");
}
