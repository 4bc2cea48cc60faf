//! Route definitions for the `/firms` resource.
//!
//! ```text
//! GET    /                          search_firms (public)
//! GET    /by-slug/{slug}            get_firm (public page)
//! POST   /{id}/changes              submit_firm_change (owner/admin)
//! GET    /{id}/preview              preview_firm (owner/admin)
//! POST   /{id}/invitations          invite_lawyer (owner/admin)
//! GET    /{id}/invitations          list_firm_invitations (owner/admin)
//! DELETE /{id}/members/{lawyer_id}  remove_member (owner/admin)
//! ```

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{firm, membership};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(firm::search_firms))
        .route("/by-slug/{slug}", get(firm::get_firm))
        .route("/{id}/changes", post(firm::submit_firm_change))
        .route("/{id}/preview", get(firm::preview_firm))
        .route(
            "/{id}/invitations",
            post(membership::invite_lawyer).get(membership::list_firm_invitations),
        )
        .route(
            "/{id}/members/{lawyer_id}",
            delete(membership::remove_member),
        )
}
