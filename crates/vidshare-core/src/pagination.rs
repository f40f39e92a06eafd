//! Page-based slicing shared by every listing
//!
//! Pages are 1-based. A page past the end is not an error: it yields no items
//! while still reporting `total_pages` and echoing the requested page.

use serde::Serialize;

/// Offset/limit window for one page of a result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
    pub total_pages: u64,
    pub current_page: u32,
}

impl PageWindow {
    /// Whether the requested page lies beyond the last page
    #[inline]
    pub fn is_past_end(&self) -> bool {
        u64::from(self.current_page) > self.total_pages
    }
}

/// Compute the window for `page` of `total_count` items at `page_size` per page.
///
/// `page` and `page_size` below 1 are treated as 1.
pub fn paginate(total_count: u64, page: u32, page_size: u32) -> PageWindow {
    let page = page.max(1);
    let page_size = page_size.max(1);
    PageWindow {
        offset: u64::from(page - 1) * u64::from(page_size),
        limit: page_size,
        total_pages: total_count.div_ceil(u64::from(page_size)),
        current_page: page,
    }
}

/// Caller-supplied paging parameters with defaults and clamping applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Resolve optional parameters: missing page is 1, missing size is
    /// `default_size`, size is clamped to `[1, max_size]`.
    pub fn new(page: Option<u32>, page_size: Option<u32>, default_size: u32, max_size: u32) -> Self {
        let max_size = max_size.max(1);
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(default_size).clamp(1, max_size),
        }
    }

    pub fn window(&self, total_count: u64) -> PageWindow {
        paginate(total_count, self.page, self.page_size)
    }
}

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub total_pages: u64,
    pub current_page: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, window: PageWindow) -> Self {
        Self {
            items,
            total_count,
            total_pages: window.total_pages,
            current_page: window.current_page,
        }
    }

    /// Page with no items, used when the window lies past the end
    pub fn empty(total_count: u64, window: PageWindow) -> Self {
        Self::new(Vec::new(), total_count, window)
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            total_pages: self.total_pages,
            current_page: self.current_page,
        }
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.current_page) < self.total_pages
    }
}
