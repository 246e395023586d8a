//! Pagination values handed to `selectMany`
//!
//! A [`Pagination`] is computed once per request by the extraction pipeline,
//! either by a user-supplied extractor or by [`extract`], which reads
//! `limit`, `itemPerPage` and `page` from the query string.
//!
//! # Example
//!
//! ```rust
//! use resty::pagination::{self, Pagination};
//! use serde_json::json;
//!
//! let pagination = pagination::extract(&json!({ "limit": "2", "page": "3" }));
//! assert_eq!(pagination, Pagination::new().with_limit(2).with_page(3));
//! assert_eq!(pagination.item_per_page, 10);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default `limit` when the request does not carry one
pub const DEFAULT_LIMIT: u64 = 1;

/// Default `itemPerPage` when the request does not carry one
pub const DEFAULT_ITEM_PER_PAGE: u64 = 10;

/// Default `page` when the request does not carry one
pub const DEFAULT_PAGE: u64 = 0;

/// Request-scoped pagination parameters
///
/// No upper bound is applied to any field; adapters clamp as they see fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Maximum number of items the adapter should return
    pub limit: u64,
    /// Page size hint for adapters that paginate independently of `limit`
    pub item_per_page: u64,
    /// Requested page; adapters decide whether it is 0- or 1-based
    pub page: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            item_per_page: DEFAULT_ITEM_PER_PAGE,
            page: DEFAULT_PAGE,
        }
    }
}

impl Pagination {
    /// Pagination with every field at its default
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limit
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Set the page size hint
    #[must_use]
    pub fn with_item_per_page(mut self, item_per_page: u64) -> Self {
        self.item_per_page = item_per_page;
        self
    }

    /// Set the page
    #[must_use]
    pub fn with_page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    /// Number of items to skip when `page` is read as 1-based
    ///
    /// Pages 0 and 1 both address the first `limit` items.
    ///
    /// # Example
    ///
    /// ```rust
    /// use resty::pagination::Pagination;
    ///
    /// assert_eq!(Pagination::new().with_limit(2).with_page(0).offset(), 0);
    /// assert_eq!(Pagination::new().with_limit(2).with_page(1).offset(), 0);
    /// assert_eq!(Pagination::new().with_limit(2).with_page(2).offset(), 2);
    /// ```
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Default pagination extractor
///
/// Reads `limit`, `itemPerPage` and `page` from `raw`. Strings are parsed
/// permissively: surrounding whitespace is ignored and the leading decimal
/// digits are used (`"12abc"` reads as 12). Missing, negative or otherwise
/// unreadable values fall back to the defaults. Never fails.
pub fn extract(raw: &Value) -> Pagination {
    Pagination {
        limit: read_count(raw.get("limit")).unwrap_or(DEFAULT_LIMIT),
        item_per_page: read_count(raw.get("itemPerPage")).unwrap_or(DEFAULT_ITEM_PER_PAGE),
        page: read_count(raw.get("page")).unwrap_or(DEFAULT_PAGE),
    }
}

fn read_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f.trunc() as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(s.len());
            s[..end].parse().ok()
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.limit, 1);
        assert_eq!(pagination.item_per_page, 10);
        assert_eq!(pagination.page, 0);
    }

    #[test]
    fn test_extract_empty_source() {
        assert_eq!(extract(&json!({})), Pagination::default());
    }

    #[test]
    fn test_extract_non_object_source() {
        assert_eq!(extract(&Value::Null), Pagination::default());
        assert_eq!(extract(&json!([1, 2, 3])), Pagination::default());
    }

    #[test]
    fn test_extract_query_string_values() {
        let pagination = extract(&json!({ "limit": "2", "page": "2", "itemPerPage": "25" }));
        assert_eq!(pagination.limit, 2);
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.item_per_page, 25);
    }

    #[test]
    fn test_extract_json_numbers() {
        let pagination = extract(&json!({ "limit": 50, "page": 3.9 }));
        assert_eq!(pagination.limit, 50);
        assert_eq!(pagination.page, 3);
    }

    #[test]
    fn test_extract_permissive_strings() {
        let pagination = extract(&json!({ "limit": " 12abc ", "page": "7.5" }));
        assert_eq!(pagination.limit, 12);
        assert_eq!(pagination.page, 7);
    }

    #[test]
    fn test_extract_malformed_falls_back() {
        let pagination = extract(&json!({
            "limit": "abc",
            "page": "-2",
            "itemPerPage": true,
        }));
        assert_eq!(pagination, Pagination::default());

        let pagination = extract(&json!({ "limit": -5, "page": "" }));
        assert_eq!(pagination, Pagination::default());
    }

    #[test]
    fn test_extract_has_no_upper_bound() {
        let pagination = extract(&json!({ "limit": "1000000" }));
        assert_eq!(pagination.limit, 1_000_000);
    }

    #[test]
    fn test_offset_is_one_based_with_floor() {
        let pagination = Pagination::new().with_limit(2);
        assert_eq!(pagination.with_page(0).offset(), 0);
        assert_eq!(pagination.with_page(1).offset(), 0);
        assert_eq!(pagination.with_page(2).offset(), 2);
        assert_eq!(pagination.with_page(3).offset(), 4);
    }

    #[test]
    fn test_serde_uses_camel_case() {
        let json = serde_json::to_value(Pagination::default()).unwrap();
        assert_eq!(json, json!({ "limit": 1, "itemPerPage": 10, "page": 0 }));
    }
}
