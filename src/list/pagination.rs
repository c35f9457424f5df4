//! Pagination model
//!
//! Page arithmetic and a declarative list of page links for a list view.

/// Pages shown on each side of the current one.
const WINDOW_RADIUS: usize = 2;

/// One control of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Previous { page: usize, disabled: bool },
    Page { number: usize, active: bool },
    Ellipsis,
    Next { page: usize, disabled: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    page_size: usize,
    total_count: u64,
}

impl Pagination {
    pub fn new(page: usize, page_size: usize, total_count: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total_count,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn total_pages(&self) -> usize {
        usize::try_from(self.total_count)
            .unwrap_or(usize::MAX)
            .div_ceil(self.page_size)
    }

    /// First and last page number shown around the current page.
    pub fn window(&self) -> (usize, usize) {
        let start = self.page.saturating_sub(WINDOW_RADIUS).max(1);
        let end = self.page.saturating_add(WINDOW_RADIUS).min(self.total_pages());
        (start, end)
    }

    /// Previous, first page and ellipsis, window, ellipsis and last page, Next.
    pub fn links(&self) -> Vec<PageLink> {
        let total = self.total_pages();
        let (start, end) = self.window();
        let mut links = vec![PageLink::Previous {
            page: self.page.saturating_sub(1).max(1),
            disabled: self.page <= 1,
        }];

        if start > 1 {
            links.push(PageLink::Page {
                number: 1,
                active: false,
            });
            if start > 2 {
                links.push(PageLink::Ellipsis);
            }
        }

        for number in start..=end {
            links.push(PageLink::Page {
                number,
                active: number == self.page,
            });
        }

        if end < total {
            if end + 1 < total {
                links.push(PageLink::Ellipsis);
            }
            links.push(PageLink::Page {
                number: total,
                active: false,
            });
        }

        links.push(PageLink::Next {
            page: self.page.saturating_add(1).min(total.max(1)),
            disabled: self.page >= total,
        });

        links
    }

    /// 1-based positions of the first and last row on this page, `(0, 0)`
    /// when the list is empty.
    pub fn showing_range(&self) -> (u64, u64) {
        if self.total_count == 0 {
            return (0, 0);
        }
        let size = self.page_size as u64;
        let page = self.page as u64;
        let start = page.saturating_sub(1).saturating_mul(size).saturating_add(1);
        let end = page.saturating_mul(size).min(self.total_count);
        (start, end)
    }

    pub fn info_text(&self) -> String {
        let (start, end) = self.showing_range();
        format!("Showing {}-{} of {} items", start, end, self.total_count)
    }
}
