//! Integration tests for the append-only audit trail.

mod common;

use ausverity_core::audit::{ACTION_INVITE_LAWYER_TO_FIRM, ACTION_LEAVE_FIRM};
use ausverity_core::roles::ROLE_LAWYER;
use common::seed_user;
use serde_json::json;
use sqlx::PgPool;

use ausverity_db::models::audit::{AuditQuery, CreateAuditLog};
use ausverity_db::repositories::AuditLogRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_and_filtered_query(pool: PgPool) {
    let user = seed_user(&pool, "owner@firm.example", ROLE_LAWYER).await;

    AuditLogRepo::insert(
        &pool,
        &CreateAuditLog::for_entity(user.id, ACTION_INVITE_LAWYER_TO_FIRM, "firm_invitation", 1)
            .with_metadata(json!({"firm_id": 10})),
    )
    .await
    .unwrap();
    AuditLogRepo::insert(
        &pool,
        &CreateAuditLog::for_entity(user.id, ACTION_LEAVE_FIRM, "lawyer", 2),
    )
    .await
    .unwrap();

    let all = AuditLogRepo::query(&pool, &AuditQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let invites = AuditLogRepo::query(
        &pool,
        &AuditQuery {
            action: Some(ACTION_INVITE_LAWYER_TO_FIRM.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(invites.len(), 1);
    assert_eq!(invites[0].entity_type.as_deref(), Some("firm_invitation"));
    assert_eq!(invites[0].metadata.as_ref().unwrap()["firm_id"], 10);

    let total = AuditLogRepo::count(
        &pool,
        &AuditQuery {
            user_id: Some(user.id),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(total, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn record_or_warn_swallows_failures(pool: PgPool) {
    // A non-existent actor violates the user_id foreign key; the best-effort
    // path must not propagate the error.
    AuditLogRepo::record_or_warn(
        &pool,
        CreateAuditLog::for_entity(999_999, ACTION_LEAVE_FIRM, "lawyer", 1),
    )
    .await;

    let total = AuditLogRepo::count(&pool, &AuditQuery::default()).await.unwrap();
    assert_eq!(total, 0);
}
