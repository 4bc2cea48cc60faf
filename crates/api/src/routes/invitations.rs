//! Route definitions for the `/invitations` resource.
//!
//! ```text
//! GET    /                 my_invitations (lawyer)
//! POST   /{id}/respond     respond_invitation (invitee/admin)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::membership;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(membership::my_invitations))
        .route("/{id}/respond", post(membership::respond_invitation))
}
