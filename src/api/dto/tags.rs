//! DTOs for tag listing, statistics and maintenance endpoints.

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::{PageWindow, PaginationMeta, PaginationParams};
use crate::domain::entities::{AccessScope, Tag, TagStats};
use crate::domain::repositories::{OrderDirection, TagsListFilter};
use crate::error::AppError;
use crate::utils::tag_name::{MAX_TAG_NAME_LEN, TAG_NAME_REGEX, parse_tag_list};

/// Query parameters for `GET /api/tags` and `GET /api/tags/stats`.
///
/// # Example
///
/// ```text
/// GET /api/tags?withStats=true&searchTerm=foo&orderBy=tag-DESC&page=2&itemsPerPage=20
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsParams {
    #[serde(flatten)]
    pub pagination: PaginationParams,

    #[serde(default)]
    pub search_term: Option<String>,

    /// `tag`, `tag-ASC` or `tag-DESC`.
    #[serde(default)]
    pub order_by: Option<String>,

    /// Only the literal value `true` enables stats.
    #[serde(default)]
    pub with_stats: Option<String>,
}

impl ListTagsParams {
    pub fn wants_stats(&self) -> bool {
        self.with_stats.as_deref() == Some("true")
    }

    /// Validates the parameters and builds a repository filter for `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for bad pagination or ordering.
    pub fn to_filter(
        &self,
        scope: AccessScope,
        max_items_per_page: u32,
    ) -> Result<(TagsListFilter, PageWindow), AppError> {
        let window = self
            .pagination
            .validate_and_get_window(max_items_per_page)
            .map_err(|message| AppError::bad_request(message, json!({})))?;

        let order = parse_order_by(self.order_by.as_deref())?;

        let search_term = self
            .search_term
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        if search_term.as_deref().is_some_and(|term| term.contains('\0')) {
            return Err(AppError::bad_request(
                "Invalid searchTerm",
                json!({ "reason": "searchTerm cannot contain NUL characters" }),
            ));
        }

        let filter = TagsListFilter::new()
            .with_search_term(search_term)
            .with_order(order)
            .with_window(window.limit, window.offset)
            .with_scope(scope);

        Ok((filter, window))
    }
}

/// Parses `orderBy` into a sort direction. Tags can only be sorted by name.
pub fn parse_order_by(raw: Option<&str>) -> Result<OrderDirection, AppError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(OrderDirection::Asc);
    };

    let (field, direction) = match raw.split_once('-') {
        Some((field, direction)) => (field, Some(direction)),
        None => (raw, None),
    };

    let invalid = || {
        AppError::bad_request(
            "Invalid orderBy",
            json!({ "orderBy": raw, "allowed": ["tag", "tag-ASC", "tag-DESC"] }),
        )
    };

    if field != "tag" {
        return Err(invalid());
    }

    match direction {
        None => Ok(OrderDirection::Asc),
        Some(d) if d.eq_ignore_ascii_case("asc") => Ok(OrderDirection::Asc),
        Some(d) if d.eq_ignore_ascii_case("desc") => Ok(OrderDirection::Desc),
        Some(_) => Err(invalid()),
    }
}

/// Envelope shared by tag listing responses: `{"tags": {...}}`.
#[derive(Debug, Serialize)]
pub struct TagsResponse<T> {
    pub tags: T,
}

/// Body of `GET /api/tags`.
///
/// `stats` is present only when `withStats=true` was requested.
#[derive(Debug, Serialize)]
pub struct TagListBody {
    pub data: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<TagStatsItem>>,

    pub pagination: PaginationMeta,
}

impl TagListBody {
    pub fn from_tags(tags: Vec<Tag>, window: &PageWindow, total: i64) -> Self {
        let pagination = PaginationMeta::new(window, tags.len(), total);

        Self {
            data: tags.into_iter().map(|tag| tag.name).collect(),
            stats: None,
            pagination,
        }
    }

    pub fn from_stats(stats: Vec<TagStats>, window: &PageWindow, total: i64) -> Self {
        let pagination = PaginationMeta::new(window, stats.len(), total);

        Self {
            data: stats.iter().map(|s| s.name.clone()).collect(),
            stats: Some(stats.into_iter().map(TagStatsItem::from).collect()),
            pagination,
        }
    }
}

/// Body of `GET /api/tags/stats`.
#[derive(Debug, Serialize)]
pub struct TagStatsBody {
    pub data: Vec<TagStatsItem>,
    pub pagination: PaginationMeta,
}

impl TagStatsBody {
    pub fn new(stats: Vec<TagStats>, window: &PageWindow, total: i64) -> Self {
        let pagination = PaginationMeta::new(window, stats.len(), total);

        Self {
            data: stats.into_iter().map(TagStatsItem::from).collect(),
            pagination,
        }
    }
}

/// Per-tag statistics as exposed over the API.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagStatsItem {
    pub tag: String,
    pub short_urls_count: i64,
    pub visits_count: i64,
}

impl From<TagStats> for TagStatsItem {
    fn from(stats: TagStats) -> Self {
        Self {
            tag: stats.name,
            short_urls_count: stats.short_urls_count,
            visits_count: stats.visits_count,
        }
    }
}

/// Query parameters for `DELETE /api/tags?tags=foo,bar`.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTagsParams {
    #[serde(default)]
    pub tags: Option<String>,
}

impl DeleteTagsParams {
    /// Comma separated names, trimmed and de-duplicated.
    pub fn names(&self) -> Vec<String> {
        self.tags.as_deref().map(parse_tag_list).unwrap_or_default()
    }
}

/// Request body for `PUT /api/tags`.
///
/// # Example
///
/// ```json
/// { "oldName": "foo", "newName": "bar" }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameTagRequest {
    #[validate(length(min = 1, max = MAX_TAG_NAME_LEN))]
    pub old_name: String,

    #[validate(
        length(min = 1, max = MAX_TAG_NAME_LEN),
        regex(path = *TAG_NAME_REGEX)
    )]
    pub new_name: String,
}
