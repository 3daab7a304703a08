// SPDX-FileCopyrightText: 2026 MiniBB Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page-number pagination for topic and post listings.

use serde::Serialize;

/// Bounds applied when interpreting caller-supplied page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_per_page: u32,
    pub max_per_page: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_per_page: 50,
            max_per_page: 100,
        }
    }
}

/// A resolved page request. Always has `page >= 1` and `per_page >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Resolve optional caller input against `limits`.
    ///
    /// Out-of-range values fall back to the defaults rather than being clamped,
    /// so `per_page = 500` with a max of 100 yields the default page size.
    pub fn parse(page: Option<i64>, per_page: Option<i64>, limits: PageLimits) -> Self {
        let page = page
            .filter(|p| *p > 0)
            .and_then(|p| u32::try_from(p).ok())
            .unwrap_or(1);
        let per_page = per_page
            .filter(|pp| *pp > 0 && *pp <= i64::from(limits.max_per_page))
            .and_then(|pp| u32::try_from(pp).ok())
            .unwrap_or(limits.default_per_page);
        Self { page, per_page }
    }

    /// Number of rows to skip.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// Build the response metadata for `total` matching rows.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta::new(self.page, self.per_page, total)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::parse(None, None, PageLimits::default())
    }
}

/// Pagination metadata returned alongside a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_pages: i64,
    pub total: i64,
}

impl PaginationMeta {
    pub fn new(page: u32, per_page: u32, total: i64) -> Self {
        let per = i64::from(per_page.max(1));
        let total = total.max(0);
        Self {
            page,
            per_page,
            total_pages: (total + per - 1) / per,
            total,
        }
    }
}
