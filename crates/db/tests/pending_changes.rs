//! Integration tests for the pending-change moderation workflow.
//!
//! Exercises the single-open-change invariant, replace-on-resubmit, approve
//! atomicity, terminal-state idempotence, and slug regeneration against a
//! real database.

mod common;

use ausverity_core::moderation::{CHANGE_APPROVED, CHANGE_PENDING, CHANGE_REJECTED};
use common::{seed_firm, seed_lawyer};
use sqlx::PgPool;

use ausverity_db::models::pending_change::{FirmPatch, LawyerPatch, ProfilePatch};
use ausverity_db::repositories::{FirmRepo, LawyerRepo, PendingChangeRepo};

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_submit_creates_single_pending_row(pool: PgPool) {
    let (_, firm) = seed_firm(&pool, "owner@firm.example", "Hartley & Associates").await;

    let patch = ProfilePatch::Firm(FirmPatch {
        name: Some("New Name".into()),
        ..Default::default()
    });
    let (change, created) = PendingChangeRepo::submit(&pool, &patch, None, Some(firm.id))
        .await
        .unwrap();

    assert!(created);
    assert_eq!(change.status, CHANGE_PENDING);
    assert_eq!(change.firm_id, Some(firm.id));
    assert_eq!(change.lawyer_id, None);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM pending_changes WHERE firm_id = $1 AND status = 'pending'",
    )
    .bind(firm.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn resubmit_replaces_row_in_place(pool: PgPool) {
    let (_, firm) = seed_firm(&pool, "owner@firm.example", "Hartley & Associates").await;

    let first = ProfilePatch::Firm(FirmPatch {
        name: Some("New Name".into()),
        ..Default::default()
    });
    let (change_a, _) = PendingChangeRepo::submit(&pool, &first, None, Some(firm.id))
        .await
        .unwrap();

    // The second patch fully replaces the stored content; it is not merged
    // with the first.
    let second = ProfilePatch::Firm(FirmPatch {
        email: Some("x@y.com".into()),
        ..Default::default()
    });
    let (change_b, created) = PendingChangeRepo::submit(&pool, &second, None, Some(firm.id))
        .await
        .unwrap();

    assert!(!created);
    assert_eq!(change_b.id, change_a.id);
    assert_eq!(change_b.changes.0, second);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pending_changes WHERE firm_id = $1")
            .bind(firm.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn open_change_index_rejects_raw_duplicate_insert(pool: PgPool) {
    let (_, lawyer) = seed_lawyer(&pool, "jane@example.com", "Jane Doe").await;

    let insert = "INSERT INTO pending_changes (entity_type, lawyer_id, changes)
                  VALUES ('lawyer', $1, '{}')";
    sqlx::query(insert)
        .bind(lawyer.id)
        .execute(&pool)
        .await
        .unwrap();

    // The second open row hits uq_pending_changes_open.
    let duplicate = sqlx::query(insert).bind(lawyer.id).execute(&pool).await;
    assert!(duplicate.is_err());
}

// ---------------------------------------------------------------------------
// Approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_merges_patch_and_settles_change(pool: PgPool) {
    let (_, lawyer) = seed_lawyer(&pool, "jane@example.com", "Jane Doe").await;

    let patch = LawyerPatch {
        bio: Some("Commercial litigation specialist.".into()),
        practice_areas: Some(vec!["Commercial".into()]),
        ..Default::default()
    };
    let (change, _) = PendingChangeRepo::submit(
        &pool,
        &ProfilePatch::Lawyer(patch.clone()),
        Some(lawyer.id),
        None,
    )
    .await
    .unwrap();

    let merged = PendingChangeRepo::approve_lawyer(&pool, change.id, &patch, None, Some("ok"))
        .await
        .unwrap()
        .expect("change was pending");

    // Every patched key is reflected on the live row.
    assert_eq!(merged.bio.as_deref(), Some("Commercial litigation specialist."));
    assert_eq!(merged.practice_areas.0, vec!["Commercial".to_string()]);
    assert_eq!(merged.status, "published");
    // Untouched fields survive.
    assert_eq!(merged.display_name, "Jane Doe");

    let settled = PendingChangeRepo::find_by_id(&pool, change.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, CHANGE_APPROVED);
    assert!(settled.processed_at.is_some());
    assert_eq!(settled.admin_notes.as_deref(), Some("ok"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn approve_regenerates_slug_on_rename(pool: PgPool) {
    let (_, firm) = seed_firm(&pool, "owner@firm.example", "Hartley & Associates").await;
    assert_eq!(firm.slug, "hartley-associates");

    let patch = FirmPatch {
        name: Some("Hartley Legal Group".into()),
        ..Default::default()
    };
    let (change, _) = PendingChangeRepo::submit(
        &pool,
        &ProfilePatch::Firm(patch.clone()),
        None,
        Some(firm.id),
    )
    .await
    .unwrap();

    let base = ausverity_core::slug::slugify(patch.name.as_deref().unwrap());
    let slug = FirmRepo::find_available_slug(&pool, &base, Some(firm.id))
        .await
        .unwrap();
    let merged = PendingChangeRepo::approve_firm(&pool, change.id, &patch, Some(&slug), None)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(merged.name, "Hartley Legal Group");
    assert_eq!(merged.slug, "hartley-legal-group");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_decision_loses_and_leaves_state_alone(pool: PgPool) {
    let (_, lawyer) = seed_lawyer(&pool, "jane@example.com", "Jane Doe").await;

    let patch = LawyerPatch {
        bio: Some("First version of the bio.".into()),
        ..Default::default()
    };
    let (change, _) = PendingChangeRepo::submit(
        &pool,
        &ProfilePatch::Lawyer(patch.clone()),
        Some(lawyer.id),
        None,
    )
    .await
    .unwrap();

    let first = PendingChangeRepo::reject(&pool, change.id, Some("insufficient detail"))
        .await
        .unwrap();
    assert!(first.is_some());

    // A late approve observes the settled row and applies nothing.
    let second = PendingChangeRepo::approve_lawyer(&pool, change.id, &patch, None, None)
        .await
        .unwrap();
    assert!(second.is_none());

    let live = LawyerRepo::find_by_id(&pool, lawyer.id).await.unwrap().unwrap();
    assert_eq!(live.bio, None);
    assert_eq!(live.status, "draft");

    let settled = PendingChangeRepo::find_by_id(&pool, change.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settled.status, CHANGE_REJECTED);
    assert_eq!(settled.admin_notes.as_deref(), Some("insufficient detail"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reject_never_touches_live_profile(pool: PgPool) {
    let (_, firm) = seed_firm(&pool, "owner@firm.example", "Hartley & Associates").await;

    let patch = FirmPatch {
        name: Some("Should Not Appear".into()),
        ..Default::default()
    };
    let (change, _) = PendingChangeRepo::submit(
        &pool,
        &ProfilePatch::Firm(patch),
        None,
        Some(firm.id),
    )
    .await
    .unwrap();

    PendingChangeRepo::reject(&pool, change.id, None).await.unwrap();

    let live = FirmRepo::find_by_id(&pool, firm.id).await.unwrap().unwrap();
    assert_eq!(live.name, "Hartley & Associates");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn settled_change_permits_fresh_submission(pool: PgPool) {
    let (_, firm) = seed_firm(&pool, "owner@firm.example", "Hartley & Associates").await;

    let patch = ProfilePatch::Firm(FirmPatch {
        description: Some("Boutique commercial practice.".into()),
        ..Default::default()
    });
    let (first, _) = PendingChangeRepo::submit(&pool, &patch, None, Some(firm.id))
        .await
        .unwrap();
    PendingChangeRepo::reject(&pool, first.id, None).await.unwrap();

    // The partial unique index only covers open rows, so a new cycle starts
    // with a new row.
    let (second, created) = PendingChangeRepo::submit(&pool, &patch, None, Some(firm.id))
        .await
        .unwrap();
    assert!(created);
    assert_ne!(second.id, first.id);
}
