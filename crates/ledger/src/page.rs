//! Page request/response types for list queries.

use serde::Serialize;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: usize = 100;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Missing values fall back to the defaults; size is clamped to
    /// `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<usize>, size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Cut one page out of an already ordered result set.
    pub fn slice<T>(&self, rows: Vec<T>) -> Page<T> {
        let total = rows.len();
        let content = rows.into_iter().skip(self.offset()).take(self.size).collect();
        Page::new(content, *self, total)
    }
}

/// One page of results plus enough metadata to navigate the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = total_elements.div_ceil(request.size.max(1));
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
            first: request.page == 0,
            last: request.page.saturating_add(1) >= total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            first: self.first,
            last: self.last,
        }
    }
}
