//! Page-based pagination utilities.

use serde::{Deserialize, Serialize};

/// Default page size when the client does not send `limit`.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    /// Builds a page request from optional query values.
    ///
    /// `page` is at least 1 and `limit` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset for `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Builds the response metadata for a total row count.
    pub fn meta(&self, total: i64) -> Pagination {
        Pagination {
            total,
            page: self.page,
            pages: total_pages(total, self.limit),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Pagination block of the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

/// Number of pages needed to show `total` rows at `limit` per page.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
