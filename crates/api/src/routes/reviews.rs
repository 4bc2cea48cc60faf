//! Route definitions for the `/reviews` resource.
//!
//! ```text
//! POST   /{id}/respond     respond_review (reviewed lawyer/admin)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/respond", post(review::respond_review))
}
