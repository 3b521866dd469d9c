//! Pagination query parameters and response metadata.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

/// Pagination query parameters.
///
/// Uses `serde_with` to parse numbers from query strings, which keeps them
/// working inside `#[serde(flatten)]`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub items_per_page: Option<u32>,
}

/// A validated page request translated into a database window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub items_per_page: Option<u32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Validates pagination parameters and converts them to offset/limit.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `itemsPerPage`: unset, meaning every item on a single page. `page`
    ///   is ignored in that case.
    ///
    /// # Validation
    ///
    /// - Page must be > 0
    /// - Items per page must be between 1 and `max_items_per_page`
    pub fn validate_and_get_window(&self, max_items_per_page: u32) -> Result<PageWindow, String> {
        let page = self.page.unwrap_or(1);

        if page == 0 {
            return Err("Page must be greater than 0".to_string());
        }

        let Some(items_per_page) = self.items_per_page else {
            return Ok(PageWindow {
                page: 1,
                items_per_page: None,
                limit: None,
                offset: None,
            });
        };

        if !(1..=max_items_per_page).contains(&items_per_page) {
            return Err(format!(
                "Items per page must be between 1 and {max_items_per_page}"
            ));
        }

        Ok(PageWindow {
            page,
            items_per_page: Some(items_per_page),
            limit: Some(i64::from(items_per_page)),
            offset: Some(i64::from(page - 1) * i64::from(items_per_page)),
        })
    }
}

/// Pagination metadata for responses.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub current_page: u32,
    pub pages_count: u32,
    pub items_per_page: i64,
    pub items_in_current_page: usize,
    pub total_items: i64,
}

impl PaginationMeta {
    /// Builds metadata for a page of `items_in_current_page` results out of
    /// `total_items`. There is always at least one page.
    pub fn new(window: &PageWindow, items_in_current_page: usize, total_items: i64) -> Self {
        let (items_per_page, pages_count) = match window.items_per_page {
            Some(per_page) => {
                let per_page = i64::from(per_page);
                let pages = (total_items + per_page - 1) / per_page;
                (per_page, u32::try_from(pages.max(1)).unwrap_or(u32::MAX))
            }
            None => (total_items, 1),
        };

        Self {
            current_page: window.page,
            pages_count,
            items_per_page,
            items_in_current_page,
            total_items,
        }
    }
}
