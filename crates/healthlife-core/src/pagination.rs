// ABOUTME: Offset pagination shared by every record gateway
// ABOUTME: PageQuery carries filters and paging, Page carries total and ordered rows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HealthLife Contributors

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::paging::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Filters and paging for one gateway `page` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// 1-based page number
    pub page: u32,
    /// Rows per page
    pub page_size: u32,
    /// Owner filter
    pub user_id: Option<String>,
    /// Inclusive lower bound on `record_date`
    pub start: Option<NaiveDate>,
    /// Inclusive upper bound on `record_date`
    pub end: Option<NaiveDate>,
    /// Meal type or exercise type, depending on the record kind
    pub type_filter: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            user_id: None,
            start: None,
            end: None,
            type_filter: None,
        }
    }
}

impl PageQuery {
    /// First page of `page_size` rows for one user
    #[must_use]
    pub fn for_user(user_id: impl Into<String>, page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Restrict to a date range
    #[must_use]
    pub const fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Restrict to a type tag
    #[must_use]
    pub fn with_type_filter(mut self, type_filter: Option<String>) -> Self {
        self.type_filter = type_filter.filter(|t| !t.is_empty());
        self
    }

    /// Page number, with 0 treated as the first page
    #[must_use]
    pub fn effective_page(&self) -> u32 {
        self.page.max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// Number of rows skipped before this page
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.effective_page() - 1) * u64::from(self.effective_page_size())
    }
}

/// One page of rows with the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Matching rows across all pages
    pub total: i64,
    /// Rows of this page, newest first
    pub rows: Vec<T>,
}

impl<T> Page<T> {
    /// Page with no rows
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total: 0,
            rows: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_treats_zero_page_as_first() {
        let query = PageQuery {
            page: 0,
            page_size: 10,
            ..PageQuery::default()
        };
        assert_eq!(query.offset(), 0);
        assert_eq!(PageQuery::for_user("u", 3, 20).offset(), 40);
    }

    #[test]
    fn test_page_size_is_clamped() {
        let query = PageQuery::for_user("u", 1, 10_000);
        assert_eq!(query.effective_page_size(), MAX_PAGE_SIZE);
    }
}
