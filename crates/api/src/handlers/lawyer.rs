//! Handlers for lawyer profiles: public directory reads, draft submission,
//! and the merged preview.

use ausverity_core::audit::{ACTION_SUBMIT_PROFILE_CHANGE, ACTION_UPDATE_PROFILE_CHANGE};
use ausverity_core::error::CoreError;
use ausverity_core::moderation::ENTITY_LAWYER;
use ausverity_core::policy::{authorize, Action};
use ausverity_core::profile::PROFILE_PUBLISHED;
use ausverity_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::firm::FirmProfile;
use ausverity_db::models::lawyer::{LawyerProfile, LawyerSearch};
use ausverity_db::models::pending_change::{LawyerPatch, PendingChange, ProfilePatch};
use ausverity_db::models::relationship::RelationshipHistory;
use ausverity_db::models::review::RatingSummary;
use ausverity_db::repositories::{
    AuditLogRepo, FirmRepo, LawyerRepo, PendingChangeRepo, RelationshipHistoryRepo, ReviewRepo,
};
use ausverity_events::{DomainEvent, EventBus};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Public lawyer page payload: profile, aggregated rating, current firm.
#[derive(Debug, Serialize)]
pub struct LawyerPublicView {
    pub profile: LawyerProfile,
    pub rating: RatingSummary,
    pub firm: Option<FirmProfile>,
}

/// Owner-facing merged view of the live profile plus the open draft.
#[derive(Debug, Serialize)]
pub struct LawyerPreview {
    pub profile: LawyerProfile,
    pub has_pending_change: bool,
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/v1/lawyers
///
/// Search published lawyer profiles.
pub async fn search_lawyers(
    State(state): State<AppState>,
    Query(params): Query<LawyerSearch>,
) -> AppResult<Json<DataResponse<Vec<LawyerProfile>>>> {
    let lawyers = LawyerRepo::search_published(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: lawyers }))
}

/// GET /api/v1/lawyers/{slug}
///
/// Public profile page: published profiles only, with rating aggregate and
/// current firm.
pub async fn get_lawyer(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<LawyerPublicView>>> {
    let profile = LawyerRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|p| p.status == PROFILE_PUBLISHED)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Lawyer",
                key: slug.clone(),
            })
        })?;

    let rating = ReviewRepo::rating_summary(&state.pool, profile.id).await?;
    let firm = match profile.firm_id {
        Some(firm_id) => FirmRepo::find_by_id(&state.pool, firm_id).await?,
        None => None,
    };

    Ok(Json(DataResponse {
        data: LawyerPublicView {
            profile,
            rating,
            firm,
        },
    }))
}

/// GET /api/v1/lawyers/{id}/history
///
/// Closed firm-affiliation intervals, shown on the public career timeline.
pub async fn list_lawyer_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RelationshipHistory>>>> {
    ensure_lawyer_exists(&state.pool, id).await?;
    let history = RelationshipHistoryRepo::list_for_lawyer(&state.pool, id).await?;
    Ok(Json(DataResponse { data: history }))
}

// ---------------------------------------------------------------------------
// Draft submission and preview
// ---------------------------------------------------------------------------

/// POST /api/v1/lawyers/{id}/changes
///
/// Propose edits to a lawyer profile. Replaces any open draft for the same
/// profile; the live record is untouched until an admin approves.
pub async fn submit_lawyer_change(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<LawyerPatch>,
) -> AppResult<(StatusCode, Json<DataResponse<PendingChange>>)> {
    let profile = fetch_lawyer(&state.pool, id).await?;
    authorize(
        &auth.actor(),
        &Action::SubmitLawyerChange {
            profile_owner: profile.user_id,
        },
    )
    .map_err(AppError::Core)?;

    if patch.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Patch contains no changes".into(),
        )));
    }

    let (change, created) = PendingChangeRepo::submit(
        &state.pool,
        &ProfilePatch::Lawyer(patch),
        Some(profile.id),
        None,
    )
    .await?;

    let action = if created {
        ACTION_SUBMIT_PROFILE_CHANGE
    } else {
        ACTION_UPDATE_PROFILE_CHANGE
    };
    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, action, ENTITY_LAWYER, profile.id),
    )
    .await;
    publish_submitted(&state.event_bus, auth.user_id, ENTITY_LAWYER, change.id);

    tracing::info!(
        user_id = auth.user_id,
        lawyer_id = profile.id,
        change_id = change.id,
        created,
        "Lawyer profile change submitted"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: change })))
}

/// GET /api/v1/lawyers/{id}/preview
///
/// The live profile with the open draft merged over it. Owner (or admin)
/// only; drafts are not public.
pub async fn preview_lawyer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<LawyerPreview>>> {
    let mut profile = fetch_lawyer(&state.pool, id).await?;
    authorize(
        &auth.actor(),
        &Action::SubmitLawyerChange {
            profile_owner: profile.user_id,
        },
    )
    .map_err(AppError::Core)?;

    let open =
        PendingChangeRepo::find_open(&state.pool, ENTITY_LAWYER, Some(profile.id), None).await?;
    let has_pending_change = open.is_some();
    if let Some(change) = open {
        if let ProfilePatch::Lawyer(patch) = &change.changes.0 {
            patch.apply_to(&mut profile);
        }
    }

    Ok(Json(DataResponse {
        data: LawyerPreview {
            profile,
            has_pending_change,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a lawyer profile or fail with 404.
pub async fn fetch_lawyer(
    pool: &ausverity_db::DbPool,
    id: DbId,
) -> Result<LawyerProfile, AppError> {
    LawyerRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Lawyer",
            id,
        }))
}

/// Verify a lawyer profile exists without returning it.
pub async fn ensure_lawyer_exists(
    pool: &ausverity_db::DbPool,
    id: DbId,
) -> Result<(), AppError> {
    fetch_lawyer(pool, id).await.map(|_| ())
}

pub(crate) fn publish_submitted(bus: &EventBus, actor: DbId, entity_type: &str, change_id: DbId) {
    bus.publish(
        DomainEvent::new(ausverity_events::bus::EVENT_CHANGE_SUBMITTED)
            .with_source(entity_type.to_string(), change_id)
            .with_actor(actor),
    );
}
