//! Handlers for the admin audit log console.

use axum::extract::{Query, State};
use axum::Json;

use ausverity_db::models::audit::{AuditLogPage, AuditQuery};
use ausverity_db::repositories::AuditLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/audit
///
/// Filtered, paginated view of the audit trail.
pub async fn query_audit(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> AppResult<Json<DataResponse<AuditLogPage>>> {
    let items = AuditLogRepo::query(&state.pool, &params).await?;
    let total = AuditLogRepo::count(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: AuditLogPage { items, total },
    }))
}
