//! Route definitions for the `/admin` console. Every route requires the
//! `admin` role via the [`RequireAdmin`](crate::middleware::rbac::RequireAdmin)
//! extractor on its handler.
//!
//! ```text
//! GET    /users                    list_users
//! PUT    /users/{id}/role          set_user_role
//! GET    /changes                  list_changes (moderation queue)
//! GET    /changes/{id}             get_change
//! POST   /changes/{id}/decide      decide_change
//! GET    /reviews                  list_pending_reviews
//! POST   /reviews/{id}/approve     approve_review
//! POST   /reviews/{id}/reject      reject_review
//! GET    /audit                    query_audit
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin, audit, moderation, review};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", put(admin::set_user_role))
        .route("/changes", get(moderation::list_changes))
        .route("/changes/{id}", get(moderation::get_change))
        .route("/changes/{id}/decide", post(moderation::decide_change))
        .route("/reviews", get(review::list_pending_reviews))
        .route("/reviews/{id}/approve", post(review::approve_review))
        .route("/reviews/{id}/reject", post(review::reject_review))
        .route("/audit", get(audit::query_audit))
}
