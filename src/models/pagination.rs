//! Pagination primitives shared across all list endpoints and data sources.

use serde::{Deserialize, Serialize};

/// Page number used when the caller does not supply one.
pub const DEFAULT_PAGE: i64 = 1;

/// Items per page used when the caller does not supply a page size.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Page/page-size request. Absent fields fall back to the defaults and
/// present values below 1 are clamped to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationRequest {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PaginationRequest {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE).max(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }

    /// Same request with defaults substituted, so equal pages compare equal.
    pub fn normalized(&self) -> Self {
        Self::new(self.page(), self.page_size())
    }

    /// Inverse of [`to_offset_limit`] for offsets aligned to the limit.
    pub fn from_offset_limit(offset: i64, limit: i64) -> Self {
        let limit = limit.max(1);
        let offset = offset.max(0);
        Self::new(offset / limit + 1, limit)
    }
}

/// Query-string form accepted by list endpoints: either `page`/`pageSize`
/// or the `offset`/`limit` convention used between services.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationQuery {
    /// `limit` wins over `pageSize` when both are sent.
    pub fn into_request(self) -> PaginationRequest {
        match self.limit {
            Some(limit) => PaginationRequest::from_offset_limit(self.offset.unwrap_or(0), limit),
            None => PaginationRequest {
                page: self.page,
                page_size: self.page_size,
            },
        }
    }
}

/// Zero-based skip count and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OffsetLimit {
    pub offset: i64,
    pub limit: i64,
}

pub fn to_offset_limit(req: &PaginationRequest) -> OffsetLimit {
    let limit = req.page_size();
    OffsetLimit {
        offset: (req.page() - 1).saturating_mul(limit),
        limit,
    }
}

/// `ceil(total_items / page_size)`, zero when there is nothing to page.
pub fn compute_total_pages(total_items: i64, page_size: i64) -> i64 {
    if total_items <= 0 {
        return 0;
    }
    let page_size = page_size.max(1);
    total_items / page_size + i64::from(total_items % page_size != 0)
}

/// Totals for a listing whose items are fetched separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub total_items: i64,
    pub total_pages: i64,
}

impl PageSummary {
    pub fn from_total(total_items: i64, req: &PaginationRequest) -> Self {
        Self {
            total_items,
            total_pages: compute_total_pages(total_items, req.page_size()),
        }
    }
}

/// Paged result envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl<T> PaginationResult<T> {
    /// Wrap an already-sliced page together with the total it was cut from.
    pub fn new(items: Vec<T>, total_items: i64, req: &PaginationRequest) -> Self {
        let summary = PageSummary::from_total(total_items, req);
        Self {
            items,
            page: req.page(),
            page_size: req.page_size(),
            total_items: summary.total_items,
            total_pages: summary.total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginationResult<U> {
        PaginationResult {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Slice one page out of an ordered sequence. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], req: &PaginationRequest) -> PaginationResult<T> {
    let OffsetLimit { offset, limit } = to_offset_limit(req);
    let skip = usize::try_from(offset).unwrap_or(usize::MAX);
    let take = usize::try_from(limit).unwrap_or(usize::MAX);

    let page = items.iter().skip(skip).take(take).cloned().collect();
    let total = i64::try_from(items.len()).unwrap_or(i64::MAX);

    PaginationResult::new(page, total, req)
}
