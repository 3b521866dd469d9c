//! Tag listing, statistics and maintenance service.

use std::sync::Arc;

use crate::domain::entities::{AccessScope, Tag, TagStats};
use crate::domain::repositories::{TagRepository, TagsListFilter};
use crate::error::AppError;
use crate::utils::tag_name::{MAX_TAG_NAME_LEN, is_valid_tag_name};
use serde_json::json;

/// One page of results together with the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagsPage<T> {
    pub items: Vec<T>,
    pub total: i64,
}

/// Service for listing and maintaining tags.
///
/// Reads are always evaluated under the caller's [`AccessScope`]. Writes
/// (rename, delete) affect tags globally and therefore require an
/// unrestricted scope.
pub struct TagService<R: TagRepository> {
    repository: Arc<R>,
}

impl<R: TagRepository> TagService<R> {
    /// Creates a new tag service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists tag names matching the filter, with the total for pagination.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_tags(&self, filter: TagsListFilter) -> Result<TagsPage<Tag>, AppError> {
        metrics::counter!("tag_service_calls_total", "operation" => "list_tags").increment(1);

        let (items, total) = tokio::try_join!(
            self.repository.find_tags(filter.clone()),
            self.repository.count_tags(filter)
        )?;

        Ok(TagsPage { items, total })
    }

    /// Lists tags with short URL and visit counts, with the total for
    /// pagination. The page and the total come from one snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn tags_info(&self, filter: TagsListFilter) -> Result<TagsPage<TagStats>, AppError> {
        metrics::counter!("tag_service_calls_total", "operation" => "tags_info").increment(1);

        let (items, total) = self.repository.find_tags_with_info_and_total(filter).await?;

        Ok(TagsPage { items, total })
    }

    /// Checks whether a tag named exactly `name` is visible under `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn tag_exists(&self, name: &str, scope: AccessScope) -> Result<bool, AppError> {
        self.repository.tag_exists(name, scope).await
    }

    /// Deletes tags by name.
    ///
    /// Returns the number of deleted tags. An empty list is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for restricted scopes.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn delete_tags(&self, names: &[String], scope: AccessScope) -> Result<u64, AppError> {
        ensure_unrestricted(scope, "delete tags")?;

        let deleted = self.repository.delete_by_name(names).await?;
        metrics::counter!("tags_deleted_total").increment(deleted);
        tracing::info!(requested = names.len(), deleted, "tags deleted");

        Ok(deleted)
    }

    /// Renames a tag.
    ///
    /// Renaming a tag to its current name is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for restricted scopes.
    /// Returns [`AppError::Validation`] if `new_name` is not a valid tag name.
    /// Returns [`AppError::NotFound`] if `old_name` does not exist.
    /// Returns [`AppError::Conflict`] if `new_name` is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn rename_tag(
        &self,
        old_name: &str,
        new_name: &str,
        scope: AccessScope,
    ) -> Result<Tag, AppError> {
        ensure_unrestricted(scope, "rename tags")?;

        if !is_valid_tag_name(new_name) {
            return Err(AppError::bad_request(
                "Invalid tag name",
                json!({
                    "tag": new_name,
                    "max_length": MAX_TAG_NAME_LEN,
                    "hint": "Tag names cannot contain whitespace or commas",
                }),
            ));
        }

        let existing = self
            .repository
            .find_by_name(old_name)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found", json!({ "tag": old_name })))?;

        if old_name == new_name {
            return Ok(existing);
        }

        if self.repository.find_by_name(new_name).await?.is_some() {
            return Err(AppError::conflict(
                "Tag already exists",
                json!({ "tag": new_name }),
            ));
        }

        let renamed = self.repository.rename(old_name, new_name).await?;
        tracing::info!(from = old_name, to = new_name, "tag renamed");

        Ok(renamed)
    }
}

fn ensure_unrestricted(scope: AccessScope, action: &str) -> Result<(), AppError> {
    if scope.is_unrestricted() {
        return Ok(());
    }

    Err(AppError::forbidden(
        "Forbidden",
        json!({ "reason": format!("Restricted API keys cannot {action}"), "scope": scope.to_string() }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::{MockTagRepository, OrderDirection};

    fn tag(id: i64, name: &str) -> Tag {
        Tag::new(id, name.to_string())
    }

    #[tokio::test]
    async fn test_list_tags_returns_items_and_total() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_tags()
            .withf(|f| f.limit == Some(2) && f.offset == Some(0))
            .times(1)
            .returning(|_| Ok(vec![tag(1, "bar"), tag(2, "foo")]));
        mock_repo
            .expect_count_tags()
            .times(1)
            .returning(|_| Ok(5));

        let service = TagService::new(Arc::new(mock_repo));

        let filter = TagsListFilter::new().with_window(Some(2), Some(0));
        let page = service.list_tags(filter).await.unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "bar");
    }

    #[tokio::test]
    async fn test_tags_info_reads_page_and_total_in_one_call() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_tags_with_info_and_total()
            .withf(|f| {
                f.search_term.as_deref() == Some("o")
                    && f.order == OrderDirection::Desc
                    && f.scope == AccessScope::Domain(3)
            })
            .times(1)
            .returning(|_| Ok((vec![TagStats::new("foo", 2, 5)], 1)));
        mock_repo.expect_count_tags().never();

        let service = TagService::new(Arc::new(mock_repo));

        let filter = TagsListFilter::new()
            .with_search_term(Some("o".to_string()))
            .with_order(OrderDirection::Desc)
            .with_scope(AccessScope::Domain(3));
        let page = service.tags_info(filter).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items, vec![TagStats::new("foo", 2, 5)]);
    }

    #[tokio::test]
    async fn test_tags_info_propagates_storage_errors() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_tags_with_info_and_total()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = TagService::new(Arc::new(mock_repo));

        let result = service.tags_info(TagsListFilter::new()).await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_tag_exists_delegates_with_scope() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_tag_exists()
            .withf(|name, scope| name == "foo" && *scope == AccessScope::Author(4))
            .times(1)
            .returning(|_, _| Ok(false));

        let service = TagService::new(Arc::new(mock_repo));

        assert!(!service.tag_exists("foo", AccessScope::Author(4)).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_tags_success() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_delete_by_name()
            .withf(|names| names.len() == 2 && names[0] == "foo" && names[1] == "bar")
            .times(1)
            .returning(|_| Ok(2));

        let service = TagService::new(Arc::new(mock_repo));

        let names = vec!["foo".to_string(), "bar".to_string()];
        let deleted = service
            .delete_tags(&names, AccessScope::Unrestricted)
            .await
            .unwrap();

        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_delete_tags_forbidden_for_restricted_scope() {
        let mock_repo = MockTagRepository::new();
        let service = TagService::new(Arc::new(mock_repo));

        let names = vec!["foo".to_string()];
        let result = service.delete_tags(&names, AccessScope::Domain(1)).await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_rename_tag_success() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_by_name()
            .withf(|name| name == "foo")
            .times(1)
            .returning(|_| Ok(Some(tag(1, "foo"))));
        mock_repo
            .expect_find_by_name()
            .withf(|name| name == "baz")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_rename()
            .withf(|old, new| old == "foo" && new == "baz")
            .times(1)
            .returning(|_, _| Ok(tag(1, "baz")));

        let service = TagService::new(Arc::new(mock_repo));

        let renamed = service
            .rename_tag("foo", "baz", AccessScope::Unrestricted)
            .await
            .unwrap();

        assert_eq!(renamed, tag(1, "baz"));
    }

    #[tokio::test]
    async fn test_rename_tag_not_found() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_by_name()
            .times(1)
            .returning(|_| Ok(None));

        let service = TagService::new(Arc::new(mock_repo));

        let result = service
            .rename_tag("missing", "baz", AccessScope::Unrestricted)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rename_tag_conflict() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_by_name()
            .times(2)
            .returning(|name| Ok(Some(tag(1, name))));

        let service = TagService::new(Arc::new(mock_repo));

        let result = service
            .rename_tag("foo", "bar", AccessScope::Unrestricted)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_rename_tag_to_same_name_is_noop() {
        let mut mock_repo = MockTagRepository::new();

        mock_repo
            .expect_find_by_name()
            .times(1)
            .returning(|_| Ok(Some(tag(1, "foo"))));

        let service = TagService::new(Arc::new(mock_repo));

        let result = service
            .rename_tag("foo", "foo", AccessScope::Unrestricted)
            .await
            .unwrap();

        assert_eq!(result.name, "foo");
    }

    #[tokio::test]
    async fn test_rename_tag_invalid_name() {
        let mock_repo = MockTagRepository::new();
        let service = TagService::new(Arc::new(mock_repo));

        let result = service
            .rename_tag("foo", "has space", AccessScope::Unrestricted)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_rename_tag_forbidden_for_restricted_scope() {
        let mock_repo = MockTagRepository::new();
        let service = TagService::new(Arc::new(mock_repo));

        let result = service
            .rename_tag("foo", "bar", AccessScope::Author(2))
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }
}
