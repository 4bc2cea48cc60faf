//! Route definitions for the `/lawyers` resource.
//!
//! ```text
//! GET    /                    search_lawyers (public)
//! GET    /by-slug/{slug}      get_lawyer (public page)
//! GET    /{id}/history        list_lawyer_history (public)
//! POST   /{id}/changes        submit_lawyer_change (owner/admin)
//! GET    /{id}/preview        preview_lawyer (owner/admin)
//! POST   /{id}/leave          leave_firm (owner/admin)
//! POST   /{id}/reviews        submit_review (client)
//! GET    /{id}/reviews        list_reviews (public)
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{lawyer, membership, review};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lawyer::search_lawyers))
        .route("/by-slug/{slug}", get(lawyer::get_lawyer))
        .route("/{id}/history", get(lawyer::list_lawyer_history))
        .route("/{id}/changes", post(lawyer::submit_lawyer_change))
        .route("/{id}/preview", get(lawyer::preview_lawyer))
        .route("/{id}/leave", post(membership::leave_firm))
        .route(
            "/{id}/reviews",
            post(review::submit_review).get(review::list_reviews),
        )
}
