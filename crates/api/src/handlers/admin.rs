//! Handlers for the `/admin/users` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use ausverity_core::audit::ACTION_CHANGE_USER_ROLE;
use ausverity_core::error::CoreError;
use ausverity_core::roles::validate_role;
use ausverity_core::types::DbId;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use ausverity_db::models::audit::CreateAuditLog;
use ausverity_db::models::user::UserResponse;
use ausverity_db::repositories::{AuditLogRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/role`.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// GET /api/v1/admin/users
///
/// List all user accounts, newest first.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data: responses }))
}

/// PUT /api/v1/admin/users/{id}/role
///
/// Change a user's role. Audited with the previous and new role.
pub async fn set_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRoleRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_role(&input.role).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let before = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    let updated = UserRepo::set_role(&state.pool, id, &input.role)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    AuditLogRepo::record_or_warn(
        &state.pool,
        CreateAuditLog::for_entity(admin.user_id, ACTION_CHANGE_USER_ROLE, "user", updated.id)
            .with_metadata(json!({"from": before.role, "to": updated.role})),
    )
    .await;

    tracing::info!(
        user_id = admin.user_id,
        target_user_id = updated.id,
        from = %before.role,
        to = %updated.role,
        "User role changed"
    );

    Ok(Json(DataResponse {
        data: UserResponse::from(&updated),
    }))
}
