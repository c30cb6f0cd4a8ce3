//! Shared query parameter types for API handlers.

use breakdown_core::search::{
    clamp_limit, clamp_page, contains_pattern, page_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use breakdown_core::types::DbId;
use serde::Deserialize;

/// Listing parameters (`?page=&limit=&search=`).
///
/// `page` is 1-based; `limit` defaults to 5 and is clamped to 100.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
}

/// Paging values after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl ListParams {
    pub fn paging(&self) -> Paging {
        paging(self.page, self.limit)
    }

    /// `ILIKE` pattern for the free-text search, if any.
    pub fn pattern(&self) -> Option<String> {
        self.search.as_deref().and_then(contains_pattern)
    }
}

/// Clamp raw page/limit values.
pub fn paging(page: Option<i64>, limit: Option<i64>) -> Paging {
    let page = clamp_page(page);
    let limit = clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
    Paging {
        page,
        limit,
        offset: page_offset(page, limit),
    }
}

/// Query parameters for the cast view (`?scene_id=`).
#[derive(Debug, Deserialize)]
pub struct CastParams {
    pub scene_id: Option<DbId>,
}
