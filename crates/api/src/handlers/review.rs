//! Handlers for client reviews: submission, public listing, the lawyer's
//! response, and admin moderation.

use ausverity_core::audit::{
    ACTION_APPROVE_REVIEW, ACTION_REJECT_REVIEW, ACTION_RESPOND_TO_REVIEW, ACTION_SUBMIT_REVIEW,
};
use ausverity_core::error::CoreError;
use ausverity_core::policy::{authorize, Action};
use ausverity_core::review::{
    validate_comment, validate_rating, validate_response_text, REVIEW_APPROVED, REVIEW_REJECTED,
};
use ausverity_core::roles::ROLE_CLIENT;
use ausverity_core::types::DbId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::review::{CreateReview, Review};
use ausverity_db::repositories::{AuditLogRepo, ReviewRepo};
use ausverity_events::bus::{EVENT_REVIEW_MODERATED, EVENT_REVIEW_SUBMITTED};
use ausverity_events::DomainEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::lawyer::fetch_lawyer;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /lawyers/{id}/reviews`.
#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub rating: i32,
    pub comment: String,
}

/// Request body for `POST /reviews/{id}/respond`.
#[derive(Debug, Deserialize)]
pub struct ReviewResponseRequest {
    pub response: String,
}

/// Request body for `POST /admin/reviews/{id}/reject`.
#[derive(Debug, Deserialize)]
pub struct RejectReviewRequest {
    pub notes: Option<String>,
}

// ---------------------------------------------------------------------------
// Client-facing handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/lawyers/{id}/reviews
///
/// Submit a review of a lawyer. Clients only; held for moderation before it
/// becomes visible or counts toward the rating.
pub async fn submit_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(lawyer_id): Path<DbId>,
    Json(input): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Review>>)> {
    if auth.role != ROLE_CLIENT && !auth.actor().is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only clients may submit reviews".into(),
        )));
    }

    validate_rating(input.rating).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    validate_comment(&input.comment)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let lawyer = fetch_lawyer(&state.pool, lawyer_id).await?;
    if lawyer.user_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot review your own profile".into(),
        )));
    }

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            lawyer_id: lawyer.id,
            client_user_id: auth.user_id,
            rating: input.rating,
            comment: input.comment,
        },
    )
    .await?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, ACTION_SUBMIT_REVIEW, "review", review.id)
            .with_metadata(json!({"lawyer_id": lawyer.id, "rating": review.rating})),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_REVIEW_SUBMITTED)
            .with_source("review", review.id)
            .with_actor(auth.user_id),
    );

    tracing::info!(
        user_id = auth.user_id,
        lawyer_id = lawyer.id,
        review_id = review.id,
        "Review submitted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: review })))
}

/// GET /api/v1/lawyers/{id}/reviews
///
/// A lawyer's approved reviews, public.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(lawyer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    fetch_lawyer(&state.pool, lawyer_id).await?;
    let reviews = ReviewRepo::list_approved_for_lawyer(&state.pool, lawyer_id).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/reviews/{id}/respond
///
/// The reviewed lawyer publishes a one-off reply to an approved review.
pub async fn respond_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReviewResponseRequest>,
) -> AppResult<Json<DataResponse<Review>>> {
    validate_response_text(&input.response)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let review = fetch_review(&state.pool, id).await?;
    let lawyer = fetch_lawyer(&state.pool, review.lawyer_id).await?;
    authorize(
        &auth.actor(),
        &Action::RespondToReview {
            profile_owner: lawyer.user_id,
        },
    )
    .map_err(AppError::Core)?;

    let responded = ReviewRepo::set_response(&state.pool, review.id, &input.response)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(
                "Review is not approved or already has a response".into(),
            ))
        })?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(auth.user_id, ACTION_RESPOND_TO_REVIEW, "review", responded.id),
    )
    .await;

    tracing::info!(
        user_id = auth.user_id,
        review_id = responded.id,
        "Lawyer responded to review"
    );

    Ok(Json(DataResponse { data: responded }))
}

// ---------------------------------------------------------------------------
// Admin moderation
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/reviews
///
/// Reviews awaiting moderation, oldest first.
pub async fn list_pending_reviews(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Review>>>> {
    let reviews = ReviewRepo::list_pending(&state.pool, 100).await?;
    Ok(Json(DataResponse { data: reviews }))
}

/// POST /api/v1/admin/reviews/{id}/approve
///
/// Publish a review. Terminal; a duplicate decision answers 422.
pub async fn approve_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Review>>> {
    moderate(&state, admin, id, REVIEW_APPROVED, None, ACTION_APPROVE_REVIEW).await
}

/// POST /api/v1/admin/reviews/{id}/reject
///
/// Discard a review with an optional note. Terminal.
pub async fn reject_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RejectReviewRequest>,
) -> AppResult<Json<DataResponse<Review>>> {
    moderate(
        &state,
        admin,
        id,
        REVIEW_REJECTED,
        input.notes,
        ACTION_REJECT_REVIEW,
    )
    .await
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_review(pool: &ausverity_db::DbPool, id: DbId) -> Result<Review, AppError> {
    ReviewRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id,
        }))
}

async fn moderate(
    state: &AppState,
    admin: AuthUser,
    id: DbId,
    new_status: &str,
    notes: Option<String>,
    action: &'static str,
) -> AppResult<Json<DataResponse<Review>>> {
    fetch_review(&state.pool, id).await?;

    let settled = ReviewRepo::moderate(&state.pool, id, new_status, notes.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::InvalidState(format!(
                "Review {id} has already been moderated"
            )))
        })?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(admin.user_id, action, "review", settled.id).with_metadata(
            json!({
                "previous_status": "pending",
                "new_status": settled.status,
                "notes": notes,
            }),
        ),
    )
    .await;
    state.event_bus.publish(
        DomainEvent::new(EVENT_REVIEW_MODERATED)
            .with_source("review", settled.id)
            .with_actor(admin.user_id),
    );

    tracing::info!(
        user_id = admin.user_id,
        review_id = settled.id,
        status = %settled.status,
        "Review moderated"
    );

    Ok(Json(DataResponse { data: settled }))
}
