//! Repository trait for tag listing, statistics and maintenance.

use crate::domain::entities::{AccessScope, Tag, TagStats};
use crate::error::AppError;
use async_trait::async_trait;

/// Sort direction for tag listings. The sort field is always the tag name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

impl OrderDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            OrderDirection::Asc => "ASC",
            OrderDirection::Desc => "DESC",
        }
    }
}

/// Filter criteria for tag queries.
///
/// Values are expected to be validated already: `limit` is positive and
/// `offset` is non-negative. A missing `limit` selects all remaining rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsListFilter {
    pub search_term: Option<String>,
    pub order: OrderDirection,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub scope: AccessScope,
}

impl TagsListFilter {
    /// Creates an unfiltered, unscoped, ascending filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts results to tags whose name contains `term`.
    pub fn with_search_term(mut self, term: Option<String>) -> Self {
        self.search_term = term;
        self
    }

    pub fn with_order(mut self, order: OrderDirection) -> Self {
        self.order = order;
        self
    }

    /// Sets the pagination window.
    pub fn with_window(mut self, limit: Option<i64>, offset: Option<i64>) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    pub fn with_scope(mut self, scope: AccessScope) -> Self {
        self.scope = scope;
        self
    }
}

/// Repository interface for tags.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTagRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_tag.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Lists tags with their distinct short URL and visit counts.
    ///
    /// Tags are selected and windowed first, then aggregated, so pagination
    /// never scans the full tag/short URL/visit join. The scope restricts both
    /// which tags are selectable and which short URLs and visits are counted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_tags_with_info(&self, filter: TagsListFilter) -> Result<Vec<TagStats>, AppError>;

    /// Lists one window of tags with statistics together with the number of
    /// tags matching the filter without the window.
    ///
    /// The listing and the total are read from the same snapshot, so the
    /// total always agrees with the returned page.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_tags_with_info_and_total(
        &self,
        filter: TagsListFilter,
    ) -> Result<(Vec<TagStats>, i64), AppError>;

    /// Lists tags matching the filter, without statistics.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_tags(&self, filter: TagsListFilter) -> Result<Vec<Tag>, AppError>;

    /// Counts tags matching the search term and scope, ignoring the window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count_tags(&self, filter: TagsListFilter) -> Result<i64, AppError>;

    /// Checks whether a tag with exactly this name is visible under `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn tag_exists(&self, name: &str, scope: AccessScope) -> Result<bool, AppError>;

    /// Finds a tag by its exact name, ignoring any scope.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_name(&self, name: &str) -> Result<Option<Tag>, AppError>;

    /// Deletes every tag whose name is in `names`.
    ///
    /// Returns the number of deleted tags. An empty slice is a no-op
    /// returning `0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_name(&self, names: &[String]) -> Result<u64, AppError>;

    /// Renames a tag.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no tag is named `old_name`.
    /// Returns [`AppError::Conflict`] if `new_name` is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn rename(&self, old_name: &str, new_name: &str) -> Result<Tag, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults() {
        let filter = TagsListFilter::new();

        assert!(filter.search_term.is_none());
        assert_eq!(filter.order, OrderDirection::Asc);
        assert!(filter.limit.is_none());
        assert!(filter.offset.is_none());
        assert!(filter.scope.is_unrestricted());
    }

    #[test]
    fn test_filter_builder() {
        let filter = TagsListFilter::new()
            .with_search_term(Some("fo".to_string()))
            .with_order(OrderDirection::Desc)
            .with_window(Some(10), Some(20))
            .with_scope(AccessScope::Domain(4));

        assert_eq!(filter.search_term.as_deref(), Some("fo"));
        assert_eq!(filter.order.as_sql(), "DESC");
        assert_eq!(filter.limit, Some(10));
        assert_eq!(filter.offset, Some(20));
        assert_eq!(filter.scope, AccessScope::Domain(4));
    }
}
