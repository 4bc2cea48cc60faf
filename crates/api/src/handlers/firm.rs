//! Handlers for firm profiles: public directory reads, draft submission,
//! and the merged preview.

use ausverity_core::audit::{ACTION_SUBMIT_PROFILE_CHANGE, ACTION_UPDATE_PROFILE_CHANGE};
use ausverity_core::error::CoreError;
use ausverity_core::moderation::ENTITY_FIRM;
use ausverity_core::policy::{authorize, Action};
use ausverity_core::profile::PROFILE_PUBLISHED;
use ausverity_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::firm::{FirmProfile, FirmSearch};
use ausverity_db::models::lawyer::LawyerProfile;
use ausverity_db::models::pending_change::{FirmPatch, PendingChange, ProfilePatch};
use ausverity_db::repositories::{AuditLogRepo, FirmRepo, LawyerRepo, PendingChangeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::lawyer::publish_submitted;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Public firm page payload: profile plus current members.
#[derive(Debug, Serialize)]
pub struct FirmPublicView {
    pub profile: FirmProfile,
    pub members: Vec<LawyerProfile>,
}

/// Owner-facing merged view of the live firm plus the open draft.
#[derive(Debug, Serialize)]
pub struct FirmPreview {
    pub profile: FirmProfile,
    pub has_pending_change: bool,
}

// ---------------------------------------------------------------------------
// Public reads
// ---------------------------------------------------------------------------

/// GET /api/v1/firms
///
/// Search published firm profiles.
pub async fn search_firms(
    State(state): State<AppState>,
    Query(params): Query<FirmSearch>,
) -> AppResult<Json<DataResponse<Vec<FirmProfile>>>> {
    let firms = FirmRepo::search_published(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: firms }))
}

/// GET /api/v1/firms/{slug}
///
/// Public firm page: published firms only, with the current member list.
pub async fn get_firm(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<FirmPublicView>>> {
    let profile = FirmRepo::find_by_slug(&state.pool, &slug)
        .await?
        .filter(|f| f.status == PROFILE_PUBLISHED)
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Firm",
                key: slug.clone(),
            })
        })?;

    let members = LawyerRepo::list_for_firm(&state.pool, profile.id).await?;

    Ok(Json(DataResponse {
        data: FirmPublicView { profile, members },
    }))
}

// ---------------------------------------------------------------------------
// Draft submission and preview
// ---------------------------------------------------------------------------

/// POST /api/v1/firms/{id}/changes
///
/// Propose edits to a firm profile. A firm that has never been published
/// must reach a complete contact card (name, email, phone) with its first
/// submission.
pub async fn submit_firm_change(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<FirmPatch>,
) -> AppResult<(StatusCode, Json<DataResponse<PendingChange>>)> {
    let profile = fetch_firm(&state.pool, id).await?;
    authorize(
        &auth.actor(),
        &Action::SubmitFirmChange {
            firm_owner: profile.owner_user_id,
        },
    )
    .map_err(AppError::Core)?;

    if patch.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Patch contains no changes".into(),
        )));
    }
    if profile.status != PROFILE_PUBLISHED {
        patch
            .validate_first_submission(&profile)
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let (change, created) = PendingChangeRepo::submit(
        &state.pool,
        &ProfilePatch::Firm(patch),
        None,
        Some(profile.id),
    )
    .await?;

    let action = if created {
        ACTION_SUBMIT_PROFILE_CHANGE
    } else {
        ACTION_UPDATE_PROFILE_CHANGE
    };
    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, action, ENTITY_FIRM, profile.id),
    )
    .await;
    publish_submitted(&state.event_bus, auth.user_id, ENTITY_FIRM, change.id);

    tracing::info!(
        user_id = auth.user_id,
        firm_id = profile.id,
        change_id = change.id,
        created,
        "Firm profile change submitted"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(DataResponse { data: change })))
}

/// GET /api/v1/firms/{id}/preview
///
/// The live firm with the open draft merged over it. Owner (or admin) only.
pub async fn preview_firm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FirmPreview>>> {
    let mut profile = fetch_firm(&state.pool, id).await?;
    authorize(
        &auth.actor(),
        &Action::SubmitFirmChange {
            firm_owner: profile.owner_user_id,
        },
    )
    .map_err(AppError::Core)?;

    let open = PendingChangeRepo::find_open(&state.pool, ENTITY_FIRM, None, Some(profile.id)).await?;
    let has_pending_change = open.is_some();
    if let Some(change) = open {
        if let ProfilePatch::Firm(patch) = &change.changes.0 {
            patch.apply_to(&mut profile);
        }
    }

    Ok(Json(DataResponse {
        data: FirmPreview {
            profile,
            has_pending_change,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a firm profile or fail with 404.
pub async fn fetch_firm(pool: &ausverity_db::DbPool, id: DbId) -> Result<FirmProfile, AppError> {
    FirmRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Firm", id }))
}
