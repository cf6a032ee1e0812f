//! This module defines the common functionality for paging data.

use crate::Error;

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 50,
        }
    }
}

/// A validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    /// The 1-based page number.
    pub page: u64,
    /// The number of items per page.
    pub limit: u64,
}

impl PageParams {
    /// The number of rows to skip to reach this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.limit
    }
}

/// Validate raw `page`/`limit` query values, falling back to the configured
/// defaults for omitted values.
///
/// # Errors
/// Returns [Error::InvalidPageParameter] if either value is zero or negative.
pub fn resolve_page_params(
    page: Option<i64>,
    limit: Option<i64>,
    config: &PaginationConfig,
) -> Result<PageParams, Error> {
    let page = match page {
        Some(page) if page <= 0 => return Err(Error::InvalidPageParameter),
        Some(page) => page as u64,
        None => config.default_page,
    };

    let limit = match limit {
        Some(limit) if limit <= 0 => return Err(Error::InvalidPageParameter),
        Some(limit) => limit as u64,
        None => config.default_page_size,
    };

    Ok(PageParams { page, limit })
}

/// The number of pages needed to show `count` items at `limit` items per page.
pub fn total_pages(count: u64, limit: u64) -> u64 {
    count.div_ceil(limit)
}
