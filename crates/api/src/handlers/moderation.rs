//! Handlers for the admin moderation queue and the decide endpoint.
//!
//! Approval merges the stored patch into the live profile inside a single
//! repository transaction; this module adds authorization, slug
//! regeneration, auditing, and event publication around it.

use ausverity_core::audit::{ACTION_APPROVE_PROFILE_CHANGE, ACTION_REJECT_PROFILE_CHANGE};
use ausverity_core::error::CoreError;
use ausverity_core::moderation::{validate_decision, DECISION_APPROVE};
use ausverity_core::slug::slugify;
use ausverity_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::pending_change::{PendingChange, PendingChangeQuery, ProfilePatch};
use ausverity_db::repositories::{
    AuditLogRepo, FirmRepo, LawyerRepo, PendingChangeRepo,
};
use ausverity_events::bus::{EVENT_CHANGE_APPROVED, EVENT_CHANGE_REJECTED};
use ausverity_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/changes/{id}/decide`.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    /// `"approve"` or `"reject"`.
    pub action: String,
    /// Optional note shown to the profile owner.
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/changes
///
/// The moderation queue, oldest first. Defaults to open changes; pass
/// `status=approved|rejected` for settled history.
pub async fn list_changes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PendingChangeQuery>,
) -> AppResult<Json<DataResponse<Vec<PendingChange>>>> {
    let changes = PendingChangeRepo::query(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: changes }))
}

/// GET /api/v1/admin/changes/{id}
///
/// A single change, any status.
pub async fn get_change(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PendingChange>>> {
    let change = fetch_change(&state.pool, id).await?;
    Ok(Json(DataResponse { data: change }))
}

/// POST /api/v1/admin/changes/{id}/decide
///
/// Settle a pending change. Approve merges the patch into the live profile
/// (regenerating the slug when the display name changed) and publishes it;
/// reject discards the patch. Either way the change becomes terminal; a
/// duplicate decision answers 422.
pub async fn decide_change(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DecideRequest>,
) -> AppResult<Json<DataResponse<PendingChange>>> {
    validate_decision(&input.action)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let change = fetch_change(&state.pool, id).await?;
    let notes = input.notes.as_deref();

    let settled = if input.action == DECISION_APPROVE {
        apply_approval(&state, &change, notes).await?
    } else {
        PendingChangeRepo::reject(&state.pool, change.id, notes)
            .await?
            .is_some()
    };
    if !settled {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Change {id} has already been processed"
        ))));
    }

    let change = fetch_change(&state.pool, id).await?;
    let entity_id = change.lawyer_id.or(change.firm_id).unwrap_or(change.id);

    let (action, event_type) = if input.action == DECISION_APPROVE {
        (ACTION_APPROVE_PROFILE_CHANGE, EVENT_CHANGE_APPROVED)
    } else {
        (ACTION_REJECT_PROFILE_CHANGE, EVENT_CHANGE_REJECTED)
    };
    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(admin.user_id, action, change.entity_type.clone(), entity_id)
            .with_metadata(json!({
                "change_id": change.id,
                "previous_status": "pending",
                "new_status": change.status,
                "notes": input.notes,
            })),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(event_type)
            .with_source(change.entity_type.clone(), change.id)
            .with_actor(admin.user_id),
    );

    tracing::info!(
        user_id = admin.user_id,
        change_id = change.id,
        entity_type = %change.entity_type,
        decision = %input.action,
        "Pending change decided"
    );

    Ok(Json(DataResponse { data: change }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_change(pool: &ausverity_db::DbPool, id: DbId) -> Result<PendingChange, AppError> {
    PendingChangeRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "PendingChange",
            id,
        }))
}

/// Run the approval merge for either entity kind. Returns `false` when the
/// change was no longer pending.
async fn apply_approval(
    state: &AppState,
    change: &PendingChange,
    notes: Option<&str>,
) -> Result<bool, AppError> {
    match &change.changes.0 {
        ProfilePatch::Lawyer(patch) => {
            let lawyer_id = change.lawyer_id.ok_or_else(|| {
                AppError::InternalError("Lawyer change without lawyer_id".into())
            })?;
            let live = LawyerRepo::find_by_id(&state.pool, lawyer_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Lawyer",
                    id: lawyer_id,
                }))?;

            let new_slug = match patch.renamed_from(&live.display_name) {
                Some(name) => Some(
                    LawyerRepo::find_available_slug(&state.pool, &slugify(name), Some(live.id))
                        .await?,
                ),
                None => None,
            };

            let merged = PendingChangeRepo::approve_lawyer(
                &state.pool,
                change.id,
                patch,
                new_slug.as_deref(),
                notes,
            )
            .await?;
            Ok(merged.is_some())
        }
        ProfilePatch::Firm(patch) => {
            let firm_id = change
                .firm_id
                .ok_or_else(|| AppError::InternalError("Firm change without firm_id".into()))?;
            let live = FirmRepo::find_by_id(&state.pool, firm_id)
                .await?
                .ok_or(AppError::Core(CoreError::NotFound {
                    entity: "Firm",
                    id: firm_id,
                }))?;

            let new_slug = match patch.renamed_from(&live.name) {
                Some(name) => Some(
                    FirmRepo::find_available_slug(&state.pool, &slugify(name), Some(live.id))
                        .await?,
                ),
                None => None,
            };

            let merged = PendingChangeRepo::approve_firm(
                &state.pool,
                change.id,
                patch,
                new_slug.as_deref(),
                notes,
            )
            .await?;
            Ok(merged.is_some())
        }
    }
}
