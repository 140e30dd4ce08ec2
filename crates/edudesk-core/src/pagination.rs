//! Page-number pagination for list endpoints.
//!
//! Clients send `pn` (1-based page number) and `ps` (page size). Out of range
//! values are clamped rather than rejected:
//!
//! - `pn` missing or below 1 becomes 1
//! - `ps` missing, non-positive or above the configured maximum becomes the
//!   configured default
//!
//! # Example
//!
//! ```ignore
//! let page = page_params.resolve(app.default_ps, app.max_ps);
//! let (items, total) = repo.list_and_count(&filter, page).await?;
//! Ok(ApiResponse::ok(PageData::new(&page, total, items)))
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::deserialize_optional_i64;

/// Raw `pn`/`ps` query parameters.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageParams {
    /// Page number, starting at 1
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[param(minimum = 1)]
    pub pn: Option<i64>,
    /// Page size
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[param(minimum = 1)]
    pub ps: Option<i64>,
}

impl PageParams {
    pub fn resolve(&self, default_ps: i64, max_ps: i64) -> Page {
        Page::new(self.pn, self.ps, default_ps, max_ps)
    }
}

/// A resolved page. `pn >= 1` and `1 <= ps <= max_ps` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub pn: i64,
    pub ps: i64,
}

impl Page {
    pub fn new(pn: Option<i64>, ps: Option<i64>, default_ps: i64, max_ps: i64) -> Self {
        let pn = match pn {
            Some(pn) if pn >= 1 => pn,
            _ => 1,
        };
        let ps = match ps {
            Some(ps) if ps >= 1 && ps <= max_ps => ps,
            _ => default_ps,
        };
        Self { pn, ps }
    }

    pub fn limit(&self) -> i64 {
        self.ps
    }

    pub fn offset(&self) -> i64 {
        (self.pn - 1).saturating_mul(self.ps)
    }
}

/// List payload: `{pn, ps, total, items}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageData<T> {
    pub pn: i64,
    pub ps: i64,
    pub total: i64,
    pub items: Vec<T>,
}

impl<T> PageData<T> {
    pub fn new(page: &Page, total: i64, items: Vec<T>) -> Self {
        Self {
            pn: page.pn,
            ps: page.ps,
            total,
            items,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageData<U> {
        PageData {
            pn: self.pn,
            ps: self.ps,
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let page = Page::new(None, None, 20, 100);
        assert_eq!(page, Page { pn: 1, ps: 20 });
        assert_eq!(page.offset(), 0);
        assert_eq!(page.limit(), 20);
    }

    #[test]
    fn test_clamps_out_of_range_values() {
        assert_eq!(Page::new(Some(0), Some(10), 20, 100).pn, 1);
        assert_eq!(Page::new(Some(-3), Some(10), 20, 100).pn, 1);
        assert_eq!(Page::new(Some(1), Some(0), 20, 100).ps, 20);
        assert_eq!(Page::new(Some(1), Some(-5), 20, 100).ps, 20);
        assert_eq!(Page::new(Some(1), Some(500), 20, 100).ps, 20);
        assert_eq!(Page::new(Some(1), Some(100), 20, 100).ps, 100);
    }

    #[test]
    fn test_offset() {
        let page = Page::new(Some(2), Some(10), 20, 100);
        assert_eq!(page.offset(), 10);
        assert_eq!(page.limit(), 10);

        let page = Page::new(Some(5), Some(7), 20, 100);
        assert_eq!(page.offset(), 28);
    }

    #[test]
    fn test_params_deserialize_from_query_strings() {
        let params: PageParams = serde_json::from_str(r#"{"pn":"3","ps":""}"#).unwrap();
        assert_eq!(params.pn, Some(3));
        assert_eq!(params.ps, None);

        let page = params.resolve(15, 50);
        assert_eq!(page, Page { pn: 3, ps: 15 });
    }

    #[test]
    fn test_page_data_serializes_list_shape() {
        let page = Page::new(Some(2), Some(2), 20, 100);
        let data = PageData::new(&page, 5, vec!["c", "d"]);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"pn": 2, "ps": 2, "total": 5, "items": ["c", "d"]}));
    }

    #[test]
    fn test_page_data_map() {
        let page = Page::new(None, None, 10, 100);
        let data = PageData::new(&page, 2, vec![1, 2]).map(|n| n * 10);
        assert_eq!(data.items, vec![10, 20]);
        assert_eq!(data.total, 2);
    }
}
