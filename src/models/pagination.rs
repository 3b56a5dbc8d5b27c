//! Paging for the admin list endpoints (customers, venues, events, bookings,
//! payments).

use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: i64 = 25;
const MAX_PAGE_SIZE: i64 = 100;

/// `?page=2&perPage=50`. Both are optional and out-of-range values are
/// clamped rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// 1-based page number.
    pub fn current_page(&self) -> i64 {
        self.page.map_or(1, |p| p.max(1))
    }

    /// Rows per page, bound as the SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.per_page
            .map_or(DEFAULT_PAGE_SIZE, |n| n.clamp(1, MAX_PAGE_SIZE))
    }

    /// Rows skipped, bound as the SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.current_page() - 1) * self.limit()
    }
}

/// One page of rows plus the count needed to render a pager.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl<T: Serialize> PagedResult<T> {
    /// `total` is the unpaged row count from the matching `COUNT(*)`.
    pub fn new(items: Vec<T>, total: i64, pagination: &Pagination) -> Self {
        let per_page = pagination.limit();
        let total_pages = if total <= 0 {
            0
        } else {
            (total - 1) / per_page + 1
        };

        Self {
            items,
            total: total.max(0),
            page: pagination.current_page(),
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<i64>, per_page: Option<i64>) -> Pagination {
        Pagination { page, per_page }
    }

    #[test]
    fn first_page_of_twenty_five_by_default() {
        let p = Pagination::default();
        assert_eq!((p.current_page(), p.limit(), p.offset()), (1, 25, 0));
    }

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(query(None, Some(500)).limit(), 100);
        assert_eq!(query(None, Some(0)).limit(), 1);
        assert_eq!(query(Some(-4), None).current_page(), 1);
    }

    #[test]
    fn third_page_skips_two_pages_of_bookings() {
        assert_eq!(query(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn page_count_rounds_up() {
        let result = PagedResult::new(vec!["Jazz Night"; 10], 25, &query(Some(1), Some(10)));
        assert_eq!(result.total_pages, 3);

        let exact = PagedResult::new(vec!["Jazz Night"; 10], 20, &query(Some(2), Some(10)));
        assert_eq!(exact.total_pages, 2);
        assert_eq!(exact.page, 2);
    }

    #[test]
    fn empty_listing_has_no_pages() {
        let result = PagedResult::<String>::new(Vec::new(), 0, &Pagination::default());
        assert_eq!(result.total_pages, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let p: Pagination = serde_json::from_str(r#"{"page":2,"perPage":5}"#).unwrap();
        assert_eq!(p.offset(), 5);

        let json = serde_json::to_value(PagedResult::new(vec!["KICC"], 6, &p)).unwrap();
        assert_eq!(json["perPage"], 5);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["page"], 2);
    }
}
