//! Handlers for the firm membership workflow: invitations, responses,
//! leaving, and owner-initiated removal.

use ausverity_core::audit::{
    ACTION_ACCEPT_FIRM_INVITATION, ACTION_DECLINE_FIRM_INVITATION, ACTION_INVITE_LAWYER_TO_FIRM,
    ACTION_LEAVE_FIRM, ACTION_REMOVE_LAWYER_FROM_FIRM,
};
use ausverity_core::error::CoreError;
use ausverity_core::invitation::{
    expiry_for, generate_token, is_expired, validate_response, INVITATION_PENDING,
    RESPONSE_ACCEPT,
};
use ausverity_core::policy::{authorize, Action};
use ausverity_core::types::DbId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::invitation::{CreateInvitation, FirmInvitation};
use ausverity_db::models::lawyer::LawyerProfile;
use ausverity_db::repositories::{
    AuditLogRepo, InvitationRepo, LawyerRepo, MembershipRepo, UserRepo,
};
use ausverity_events::bus::{
    EVENT_INVITATION_ACCEPTED, EVENT_INVITATION_CREATED, EVENT_INVITATION_DECLINED,
    EVENT_MEMBERSHIP_LEFT, EVENT_MEMBERSHIP_REMOVED,
};
use ausverity_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::firm::fetch_firm;
use crate::handlers::lawyer::fetch_lawyer;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /firms/{id}/invitations`.
#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    /// Email of the lawyer's user account.
    #[validate(email)]
    pub lawyer_email: String,
}

/// Request body for `POST /invitations/{id}/respond`.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    /// `"accept"` or `"decline"`.
    pub action: String,
}

// ---------------------------------------------------------------------------
// Invitations
// ---------------------------------------------------------------------------

/// POST /api/v1/firms/{id}/invitations
///
/// Invite a lawyer (addressed by account email) to join the firm. The
/// invitation stays open for seven days.
pub async fn invite_lawyer(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(firm_id): Path<DbId>,
    Json(input): Json<InviteRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<FirmInvitation>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let firm = fetch_firm(&state.pool, firm_id).await?;
    authorize(
        &auth.actor(),
        &Action::InviteToFirm {
            firm_owner: firm.owner_user_id,
        },
    )
    .map_err(AppError::Core)?;

    let user = UserRepo::find_by_email(&state.pool, &input.lawyer_email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "User",
                key: input.lawyer_email.clone(),
            })
        })?;
    let lawyer = LawyerRepo::find_by_user_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Lawyer profile",
                key: input.lawyer_email.clone(),
            })
        })?;

    if lawyer.firm_id == Some(firm.id) {
        return Err(AppError::Core(CoreError::Conflict(
            "Lawyer is already a member of this firm".into(),
        )));
    }
    if InvitationRepo::exists_open(&state.pool, firm.id, lawyer.id).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "An invitation for this lawyer is already pending".into(),
        )));
    }

    // The partial unique index backstops the check above under concurrent
    // invites; the loser surfaces as 409.
    let invitation = InvitationRepo::create(
        &state.pool,
        &CreateInvitation {
            firm_id: firm.id,
            lawyer_id: lawyer.id,
            invited_by: auth.user_id,
            token: generate_token(),
            expires_at: expiry_for(Utc::now()),
        },
    )
    .await?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(
            auth.user_id,
            ACTION_INVITE_LAWYER_TO_FIRM,
            "firm_invitation",
            invitation.id,
        )
        .with_metadata(json!({"firm_id": firm.id, "lawyer_id": lawyer.id})),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_INVITATION_CREATED)
            .with_source("firm_invitation", invitation.id)
            .with_actor(auth.user_id),
    );
    // TODO: send the invitation email carrying the confirmation token once
    // the SMTP delivery subscriber lands.

    tracing::info!(
        user_id = auth.user_id,
        firm_id = firm.id,
        lawyer_id = lawyer.id,
        invitation_id = invitation.id,
        "Lawyer invited to firm"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: invitation })))
}

/// GET /api/v1/firms/{id}/invitations
///
/// A firm's invitations, owner or admin only.
pub async fn list_firm_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(firm_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FirmInvitation>>>> {
    let firm = fetch_firm(&state.pool, firm_id).await?;
    authorize(
        &auth.actor(),
        &Action::InviteToFirm {
            firm_owner: firm.owner_user_id,
        },
    )
    .map_err(AppError::Core)?;

    let invitations = InvitationRepo::list_for_firm(&state.pool, firm.id).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// GET /api/v1/invitations
///
/// The calling lawyer's own invitations.
pub async fn my_invitations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<FirmInvitation>>>> {
    let lawyer = LawyerRepo::find_by_user_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Lawyer profile",
                key: format!("user {}", auth.user_id),
            })
        })?;

    let invitations = InvitationRepo::list_for_lawyer(&state.pool, lawyer.id).await?;
    Ok(Json(DataResponse { data: invitations }))
}

/// POST /api/v1/invitations/{id}/respond
///
/// Accept or decline a pending invitation. A lapsed invitation is flipped
/// to `expired` and answers 410 before the requested action is considered.
pub async fn respond_invitation(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<FirmInvitation>>> {
    validate_response(&input.action)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let invitation = InvitationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Invitation",
            id,
        }))?;
    let lawyer = fetch_lawyer(&state.pool, invitation.lawyer_id).await?;
    authorize(
        &auth.actor(),
        &Action::RespondToInvitation {
            invitee_owner: lawyer.user_id,
        },
    )
    .map_err(AppError::Core)?;

    if invitation.status != INVITATION_PENDING {
        return Err(AppError::Core(CoreError::InvalidState(format!(
            "Invitation is already {}",
            invitation.status
        ))));
    }

    // Lazy expiry: flip first, then refuse the response.
    if is_expired(invitation.expires_at, Utc::now()) {
        InvitationRepo::mark_expired(&state.pool, invitation.id).await?;
        return Err(AppError::Core(CoreError::Expired(
            "Invitation has expired".into(),
        )));
    }

    let (settled, action, event_type) = if input.action == RESPONSE_ACCEPT {
        let result = InvitationRepo::accept(&state.pool, invitation.id).await?;
        (
            result.map(|(inv, _)| inv),
            ACTION_ACCEPT_FIRM_INVITATION,
            EVENT_INVITATION_ACCEPTED,
        )
    } else {
        let result = InvitationRepo::decline(&state.pool, invitation.id).await?;
        (result, ACTION_DECLINE_FIRM_INVITATION, EVENT_INVITATION_DECLINED)
    };
    let settled = settled.ok_or_else(|| {
        // A concurrent response settled the row between the read and the
        // guarded update.
        AppError::Core(CoreError::InvalidState(
            "Invitation has already been responded to".into(),
        ))
    })?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, action, "firm_invitation", settled.id)
            .with_metadata(json!({"firm_id": settled.firm_id, "lawyer_id": settled.lawyer_id})),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(event_type)
            .with_source("firm_invitation", settled.id)
            .with_actor(auth.user_id),
    );

    tracing::info!(
        user_id = auth.user_id,
        invitation_id = settled.id,
        response = %input.action,
        "Invitation responded to"
    );

    Ok(Json(DataResponse { data: settled }))
}

// ---------------------------------------------------------------------------
// Leaving and removal
// ---------------------------------------------------------------------------

/// POST /api/v1/lawyers/{id}/leave
///
/// The lawyer ends their own affiliation. The closing history interval is
/// written before the membership pointer is cleared.
pub async fn leave_firm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(lawyer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<LawyerProfile>>> {
    let lawyer = fetch_lawyer(&state.pool, lawyer_id).await?;
    authorize(
        &auth.actor(),
        &Action::LeaveFirm {
            profile_owner: lawyer.user_id,
        },
    )
    .map_err(AppError::Core)?;

    let firm_id = lawyer.firm_id;
    let detached = end_affiliation(&state, lawyer.id).await?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, ACTION_LEAVE_FIRM, "lawyer", lawyer.id)
            .with_metadata(json!({"firm_id": firm_id})),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_MEMBERSHIP_LEFT)
            .with_source("lawyer", lawyer.id)
            .with_actor(auth.user_id),
    );

    tracing::info!(
        user_id = auth.user_id,
        lawyer_id = lawyer.id,
        firm_id = ?firm_id,
        "Lawyer left firm"
    );

    Ok(Json(DataResponse { data: detached }))
}

/// DELETE /api/v1/firms/{firm_id}/members/{lawyer_id}
///
/// The firm owner removes a member. Same transition as leaving, initiated
/// from the firm side and recorded under its own audit verb.
pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((firm_id, lawyer_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<LawyerProfile>>> {
    let firm = fetch_firm(&state.pool, firm_id).await?;
    authorize(
        &auth.actor(),
        &Action::RemoveFromFirm {
            firm_owner: firm.owner_user_id,
        },
    )
    .map_err(AppError::Core)?;

    let lawyer = fetch_lawyer(&state.pool, lawyer_id).await?;
    if lawyer.firm_id != Some(firm.id) {
        return Err(AppError::Core(CoreError::InvalidState(
            "Lawyer is not a member of this firm".into(),
        )));
    }

    let detached = end_affiliation(&state, lawyer.id).await?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(
            auth.user_id,
            ACTION_REMOVE_LAWYER_FROM_FIRM,
            "lawyer",
            lawyer.id,
        )
        .with_metadata(json!({"firm_id": firm.id})),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_MEMBERSHIP_REMOVED)
            .with_source("lawyer", lawyer.id)
            .with_actor(auth.user_id),
    );

    tracing::info!(
        user_id = auth.user_id,
        lawyer_id = lawyer.id,
        firm_id = firm.id,
        "Lawyer removed from firm"
    );

    Ok(Json(DataResponse { data: detached }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn end_affiliation(state: &AppState, lawyer_id: DbId) -> Result<LawyerProfile, AppError> {
    MembershipRepo::end_affiliation(&state.pool, lawyer_id)
        .await?
        .map(|(_, lawyer)| lawyer)
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Lawyer is not currently affiliated with a firm".into(),
            ))
        })
}
