pub mod admin;
pub mod auth;
pub mod firms;
pub mod health;
pub mod invitations;
pub mod lawyers;
pub mod reviews;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                           register (public)
/// /auth/login                              login (public)
/// /auth/me                                 current user
///
/// /lawyers                                 directory search (public)
/// /lawyers/by-slug/{slug}                  public profile page
/// /lawyers/{id}/history                    career intervals (public)
/// /lawyers/{id}/changes                    submit draft edit
/// /lawyers/{id}/preview                    merged draft preview
/// /lawyers/{id}/leave                      leave current firm
/// /lawyers/{id}/reviews                    submit, list reviews
///
/// /firms                                   directory search (public)
/// /firms/by-slug/{slug}                    public firm page
/// /firms/{id}/changes                      submit draft edit
/// /firms/{id}/preview                      merged draft preview
/// /firms/{id}/invitations                  invite lawyer, list
/// /firms/{id}/members/{lawyer_id}          remove member (DELETE)
///
/// /invitations                             my invitations
/// /invitations/{id}/respond                accept or decline
///
/// /reviews/{id}/respond                    lawyer reply to review
///
/// /admin/users                             list users
/// /admin/users/{id}/role                   change role (PUT)
/// /admin/changes                           moderation queue
/// /admin/changes/{id}                      change detail
/// /admin/changes/{id}/decide               approve or reject
/// /admin/reviews                           review moderation queue
/// /admin/reviews/{id}/approve              publish review
/// /admin/reviews/{id}/reject               discard review
/// /admin/audit                             audit log console
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/lawyers", lawyers::router())
        .nest("/firms", firms::router())
        .nest("/invitations", invitations::router())
        .nest("/reviews", reviews::router())
        .nest("/admin", admin::router())
}
