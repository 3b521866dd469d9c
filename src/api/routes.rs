//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    delete_tags_handler, list_tags_handler, rename_tag_handler, tags_stats_handler,
};
use crate::state::AppState;
use axum::{Router, routing::get};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `GET    /tags`        - List tag names, `withStats=true` adds counts
/// - `GET    /tags/stats`  - List tags with short URL and visit counts
/// - `DELETE /tags`        - Delete tags listed in `?tags=a,b`
/// - `PUT    /tags`        - Rename a tag
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tags",
            get(list_tags_handler)
                .delete(delete_tags_handler)
                .put(rename_tag_handler),
        )
        .route("/tags/stats", get(tags_stats_handler))
}
