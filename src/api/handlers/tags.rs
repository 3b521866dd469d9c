//! Handlers for tag listing, statistics and maintenance.
//!
//! Every handler receives the caller's [`AccessScope`] from the auth
//! middleware. Listings only show tags attached to at least one short URL
//! the scope can see, and counts only include those short URLs.

use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::tags::{
    DeleteTagsParams, ListTagsParams, RenameTagRequest, TagListBody, TagStatsBody, TagsResponse,
};
use crate::domain::entities::AccessScope;
use crate::error::AppError;
use crate::state::AppState;

/// Lists tag names, optionally with statistics.
///
/// # Endpoint
///
/// `GET /api/tags`
///
/// # Query Parameters
///
/// - `withStats` (optional): `true` adds a `stats` array
/// - `searchTerm` (optional): case-insensitive substring match on the name
/// - `orderBy` (optional): `tag`, `tag-ASC` or `tag-DESC`
/// - `page` (optional): page number (default: 1)
/// - `itemsPerPage` (optional): page size (default: everything)
///
/// # Response
///
/// ```json
/// {
///   "tags": {
///     "data": ["bar", "foo"],
///     "stats": [
///       {"tag": "bar", "shortUrlsCount": 0, "visitsCount": 0},
///       {"tag": "foo", "shortUrlsCount": 2, "visitsCount": 5}
///     ],
///     "pagination": {
///       "currentPage": 1, "pagesCount": 1, "itemsPerPage": 2,
///       "itemsInCurrentPage": 2, "totalItems": 2
///     }
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request for invalid pagination or ordering.
pub async fn list_tags_handler(
    State(state): State<AppState>,
    Extension(scope): Extension<AccessScope>,
    Query(params): Query<ListTagsParams>,
) -> Result<Json<TagsResponse<TagListBody>>, AppError> {
    let (filter, window) = params.to_filter(scope, state.max_items_per_page)?;

    let body = if params.wants_stats() {
        let page = state.tag_service.tags_info(filter).await?;
        TagListBody::from_stats(page.items, &window, page.total)
    } else {
        let page = state.tag_service.list_tags(filter).await?;
        TagListBody::from_tags(page.items, &window, page.total)
    };

    Ok(Json(TagsResponse { tags: body }))
}

/// Lists tags with their short URL and visit counts.
///
/// # Endpoint
///
/// `GET /api/tags/stats`
///
/// Accepts the same query parameters as [`list_tags_handler`] except
/// `withStats`.
pub async fn tags_stats_handler(
    State(state): State<AppState>,
    Extension(scope): Extension<AccessScope>,
    Query(params): Query<ListTagsParams>,
) -> Result<Json<TagsResponse<TagStatsBody>>, AppError> {
    let (filter, window) = params.to_filter(scope, state.max_items_per_page)?;

    let page = state.tag_service.tags_info(filter).await?;

    Ok(Json(TagsResponse {
        tags: TagStatsBody::new(page.items, &window, page.total),
    }))
}

/// Deletes tags by name.
///
/// # Endpoint
///
/// `DELETE /api/tags?tags=foo,bar`
///
/// Unknown names are ignored. Short URLs keep existing, they just lose the
/// deleted tags.
///
/// # Errors
///
/// Returns 403 Forbidden for restricted API keys.
pub async fn delete_tags_handler(
    State(state): State<AppState>,
    Extension(scope): Extension<AccessScope>,
    Query(params): Query<DeleteTagsParams>,
) -> Result<StatusCode, AppError> {
    let names = params.names();

    state.tag_service.delete_tags(&names, scope).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Renames a tag.
///
/// # Endpoint
///
/// `PUT /api/tags`
///
/// # Errors
///
/// - 400 Bad Request: invalid new name
/// - 403 Forbidden: restricted API key
/// - 404 Not Found: `oldName` does not exist
/// - 409 Conflict: `newName` is already taken
pub async fn rename_tag_handler(
    State(state): State<AppState>,
    Extension(scope): Extension<AccessScope>,
    Json(payload): Json<RenameTagRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;

    state
        .tag_service
        .rename_tag(&payload.old_name, &payload.new_name, scope)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
