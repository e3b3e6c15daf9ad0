use serde::Serialize;

/// Items per page on every list surface.
pub const PAGE_SIZE: i64 = 100;

/// A 1-based page request; anything below 1 is read as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    page_size: i64,
}

impl PageRequest {
    pub fn new(page: i64) -> Self {
        Self::with_size(page, PAGE_SIZE)
    }

    pub fn with_size(page: i64, page_size: i64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_items: i64,
    pub items_per_page: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total_items: i64) -> Self {
        let total_items = total_items.max(0);
        let total_pages = if total_items > 0 {
            (total_items + request.page_size - 1) / request.page_size
        } else {
            0
        };
        Self {
            current_page: request.page,
            total_pages,
            total_items,
            items_per_page: request.page_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    /// Wraps one page already fetched with `request.limit()` / `request.offset()`.
    pub fn from_page(items: Vec<T>, request: PageRequest, total_items: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(request, total_items),
        }
    }

    /// Cuts the requested page out of a complete list. Out-of-range pages are empty.
    pub fn from_all(all: Vec<T>, request: PageRequest) -> Self {
        let total_items = all.len() as i64;
        let start = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = all
            .into_iter()
            .skip(start)
            .take(request.limit() as usize)
            .collect();
        Self::from_page(items, request, total_items)
    }
}
