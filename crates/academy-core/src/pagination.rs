//! Pagination utilities for list endpoints.
//!
//! Page based: `?page=2&limit=20`. `limit` is clamped to [1, 100] and
//! defaults to 10. Offsets saturate, so an absurd `page` yields an empty page
//! rather than an overflow.
//!
//! ```json
//! "pagination": { "page": 3, "limit": 10, "total": 42, "pages": 5, "offset": 20, "hasMore": true }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Metadata about a paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Maximum items per page (the limit that was applied)
    pub limit: i64,
    /// Total number of items across all pages
    pub total: i64,
    /// Total number of pages, `ceil(total / limit)`
    pub pages: i64,
    /// Number of items skipped
    pub offset: i64,
    /// Whether there are more items after this page
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        let offset = params.offset();

        Self {
            page: params.page(),
            limit,
            total,
            pages: total_pages(total, limit),
            offset,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}

/// `ceil(total / limit)`, zero when there is nothing to page through.
#[must_use]
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total - 1) / limit + 1
}

/// Query parameters for pagination.
#[derive(Debug, Clone, Default, Hash, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Maximum number of items to return (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Page number, values below one mean the first page.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(limit: Option<i64>, page: Option<i64>) -> PaginationParams {
        PaginationParams { limit, page }
    }

    #[test]
    fn test_defaults() {
        let p = PaginationParams::default();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_limit_is_clamped() {
        let test_cases = vec![
            (Some(1), 1),
            (Some(50), 50),
            (Some(100), 100),
            (Some(101), 100),
            (Some(0), 1),
            (Some(-1), 1),
            (None, 10),
        ];

        for (input, expected) in test_cases {
            assert_eq!(params(input, None).limit(), expected);
        }
    }

    #[test]
    fn test_page_offset() {
        let p = params(Some(20), Some(3));
        assert_eq!(p.offset(), 40);
        assert_eq!(p.page(), 3);
    }

    #[test]
    fn test_page_below_one_is_first_page() {
        let p = params(Some(10), Some(0));
        assert_eq!(p.offset(), 0);
        assert_eq!(p.page(), 1);
        assert_eq!(params(Some(10), Some(i64::MIN)).offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let p = params(Some(10), Some(i64::MAX));
        assert_eq!(p.offset(), i64::MAX);

        let meta = PaginationMeta::new(&p, 42);
        assert_eq!(meta.page, i64::MAX);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 20), 5);
        assert_eq!(total_pages(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn test_meta_last_page() {
        let meta = PaginationMeta::new(&params(Some(10), Some(5)), 42);
        assert_eq!(meta.page, 5);
        assert_eq!(meta.pages, 5);
        assert_eq!(meta.offset, 40);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_meta_middle_page() {
        let meta = PaginationMeta::new(&params(Some(10), Some(2)), 42);
        assert!(meta.has_more);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(&PaginationParams::default(), 100);
        let serialized = serde_json::to_string(&meta).unwrap();
        assert!(serialized.contains(r#""hasMore":true"#));
        assert!(serialized.contains(r#""pages":10"#));
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let json = r#"{"limit":"","page":""}"#;
        let p: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.limit(), 10);
        assert_eq!(p.page(), 1);
    }

    #[test]
    fn test_deserialize_values() {
        let json = r#"{"limit":"25","page":"2"}"#;
        let p: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.limit(), 25);
        assert_eq!(p.offset(), 25);
    }

    #[test]
    fn test_offset_follows_page_only() {
        let json = r#"{"limit":"10","page":"2","offset":"50"}"#;
        let p: PaginationParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.offset(), 10);
    }
}
