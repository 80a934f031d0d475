use serde::Serialize;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Offset/limit window handed to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u64,
}

impl PageWindow {
    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        format!(" LIMIT {} OFFSET {}", self.limit, self.offset)
    }
}

/// Represents page-based pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

/// Pagination summary returned alongside a page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl Pagination {
    /// Create pagination with page number and per-page count.
    ///
    /// Zero values fall back to the defaults.
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: if page == 0 { DEFAULT_PAGE } else { page },
            limit: if limit == 0 { DEFAULT_LIMIT } else { limit },
        }
    }

    /// Parse raw `page`/`limit` parameters. Missing or non-numeric values take
    /// the given defaults.
    pub fn from_params(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
    ) -> Self {
        let parse = |v: Option<&str>| v.and_then(|s| s.trim().parse::<u32>().ok());
        Self::new(
            parse(page).unwrap_or(DEFAULT_PAGE),
            parse(limit).unwrap_or(default_limit),
        )
    }

    /// Number of items skipped before this page
    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            offset: self.skip(),
            limit: u64::from(self.limit),
        }
    }

    /// Calculate total pages given a total count
    pub fn total_pages(&self, total_count: u64) -> u64 {
        total_count.div_ceil(u64::from(self.limit))
    }

    /// Check if there's a next page
    pub fn has_next_page(&self, total_count: u64) -> bool {
        u64::from(self.page) < self.total_pages(total_count)
    }

    /// Check if there's a previous page
    pub fn has_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Summary for a result set of `total_count` matching items.
    ///
    /// A page past the end is not an error: it reports the real page count
    /// and no next page.
    pub fn summarize(&self, total_count: u64) -> PaginationInfo {
        PaginationInfo {
            current_page: self.page,
            total_pages: self.total_pages(total_count),
            total_items: total_count,
            has_next_page: self.has_next_page(total_count),
            has_prev_page: self.has_previous_page(),
        }
    }
}
