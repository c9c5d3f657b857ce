//! Pagination math and the `{data, total}` list envelope.

use serde::{Deserialize, Serialize};

/// Page position for a list view.
///
/// Pages are 1-based here. Endpoints that count from zero are translated at
/// the client boundary through [`PageConvention`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    /// Build a consistent position: `limit >= 1`,
    /// `total_pages = max(1, ceil(total / limit))`, `page` in `[1, total_pages]`.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_pages(total, limit);
        Self {
            page: page.clamp(1, total_pages),
            limit,
            total,
            total_pages,
        }
    }

    pub fn with_total(self, total: u64) -> Self {
        Self::new(self.page, self.limit, total)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Offset of the first record on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 10, 0)
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Whether an endpoint counts pages from zero or one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageBase {
    ZeroBased,
    OneBased,
}

/// How one endpoint names and counts its pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConvention {
    pub page_key: &'static str,
    pub limit_key: &'static str,
    pub base: PageBase,
}

impl PageConvention {
    /// `GET /locations`, `GET /buildings`.
    pub const PAGE_LIMIT: PageConvention = PageConvention {
        page_key: "page",
        limit_key: "limit",
        base: PageBase::OneBased,
    };

    /// `GET /bookings`, `GET /enquiry`.
    pub const PAGE_NO_SIZE: PageConvention = PageConvention {
        page_key: "pageNo",
        limit_key: "pageSize",
        base: PageBase::ZeroBased,
    };

    /// Translate a 1-based view page into this endpoint's query pairs.
    pub fn query_pairs(&self, page: u32, limit: u32) -> [(&'static str, String); 2] {
        let page = page.max(1);
        let wire_page = match self.base {
            PageBase::ZeroBased => page - 1,
            PageBase::OneBased => page,
        };
        [
            (self.page_key, wire_page.to_string()),
            (self.limit_key, limit.max(1).to_string()),
        ]
    }
}

/// List envelope as sent by the API. Either field may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl<T> Envelope<T> {
    pub fn into_page(self) -> Page<T> {
        let total = self.total.unwrap_or(self.data.len() as u64);
        Page {
            records: self.data,
            total,
        }
    }
}

/// One page of records plus the server-side total.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            total: 0,
        }
    }

    /// Cut one page out of a full, unpaginated result set.
    pub fn slice(all: Vec<T>, page: u32, limit: u32) -> Self {
        let total = all.len() as u64;
        let position = Pagination::new(page, limit, total);
        let records = all
            .into_iter()
            .skip(position.offset())
            .take(position.limit as usize)
            .collect();
        Self { records, total }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twenty_five_records_make_three_pages() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next());
        assert!(!p.has_previous());
    }

    #[test]
    fn test_empty_total_still_has_one_page() {
        let p = Pagination::new(4, 10, 0);
        assert_eq!(p.total_pages, 1);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_zero_limit_is_floored() {
        let p = Pagination::new(1, 0, 5);
        assert_eq!(p.limit, 1);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn test_page_is_clamped_into_range() {
        assert_eq!(Pagination::new(9, 10, 25).page, 3);
        assert_eq!(Pagination::new(0, 10, 25).page, 1);
    }

    #[test]
    fn test_zero_based_convention_shifts_page() {
        let pairs = PageConvention::PAGE_NO_SIZE.query_pairs(1, 20);
        assert_eq!(pairs[0], ("pageNo", "0".to_string()));
        assert_eq!(pairs[1], ("pageSize", "20".to_string()));

        let pairs = PageConvention::PAGE_LIMIT.query_pairs(3, 10);
        assert_eq!(pairs[0], ("page", "3".to_string()));
    }

    #[test]
    fn test_envelope_tolerates_missing_fields() {
        let page = serde_json::from_str::<Envelope<u32>>("{}")
            .unwrap()
            .into_page();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 0);

        let page = serde_json::from_str::<Envelope<u32>>(r#"{"data":[1,2,3]}"#)
            .unwrap()
            .into_page();
        assert_eq!(page.total, 3);

        let page = serde_json::from_str::<Envelope<u32>>(r#"{"data":[1],"total":40}"#)
            .unwrap()
            .into_page();
        assert_eq!(page.total, 40);
    }

    #[test]
    fn test_slice_returns_last_partial_page() {
        let all: Vec<u32> = (1..=25).collect();
        let page = Page::slice(all, 3, 10);
        assert_eq!(page.records, vec![21, 22, 23, 24, 25]);
        assert_eq!(page.total, 25);
    }

    mod props {
        use super::super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_total_pages_is_ceiling(page in 0u32..500, limit in 1u32..200, total in 0u64..100_000) {
                let p = Pagination::new(page, limit, total);
                let expected = ((total + u64::from(limit) - 1) / u64::from(limit)).max(1);
                prop_assert_eq!(u64::from(p.total_pages), expected);
                prop_assert!(p.page >= 1 && p.page <= p.total_pages);
            }
        }
    }
}
