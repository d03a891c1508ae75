//! Pagination control model: previous/next buttons, a sliding window of page
//! buttons around the current page, and first/last jumps with ellipses.

use shared::protocol::PagedStudents;

pub const PAGE_SIZE_OPTIONS: [u32; 4] = [5, 10, 20, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Pages shown on each side of the current one.
const WINDOW_RADIUS: u32 = 2;

/// Paging metadata of the most recent page response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl From<&PagedStudents> for PageMeta {
    fn from(page: &PagedStudents) -> Self {
        Self {
            current_page: page.current_page,
            total_pages: page.total_pages,
            total_items: page.total_items,
            has_next: page.has_next,
            has_previous: page.has_previous,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageItem {
    /// `index` is 0-based; labels shown to the user are 1-based.
    Page { index: u32, active: bool },
    Ellipsis,
    Info(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavButton {
    pub target: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationControl {
    pub previous: NavButton,
    pub next: NavButton,
    pub items: Vec<PageItem>,
    pub page_size: u32,
    pub page_size_options: Vec<u32>,
}

impl PaginationControl {
    pub fn page_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().filter_map(|item| match item {
            PageItem::Page { index, .. } => Some(*index),
            _ => None,
        })
    }

    pub fn active_page(&self) -> Option<u32> {
        self.items.iter().find_map(|item| match item {
            PageItem::Page {
                index,
                active: true,
            } => Some(*index),
            _ => None,
        })
    }
}

pub fn build_pagination(meta: &PageMeta, page_size: u32) -> PaginationControl {
    let previous = NavButton {
        target: meta.current_page.saturating_sub(1),
        enabled: meta.has_previous,
    };
    let next = NavButton {
        target: meta.current_page.saturating_add(1),
        enabled: meta.has_next,
    };

    PaginationControl {
        previous,
        next,
        items: window_items(meta.current_page, meta.total_pages),
        page_size,
        page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
    }
}

fn window_items(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    if total_pages <= 1 {
        return vec![PageItem::Info("Page 1 of 1".to_string())];
    }

    let last = total_pages - 1;
    let current = current_page.min(last);
    let start = current.saturating_sub(WINDOW_RADIUS);
    let end = current.saturating_add(WINDOW_RADIUS).min(last);

    let mut items = Vec::new();
    if start > 0 {
        items.push(PageItem::Page {
            index: 0,
            active: false,
        });
        if start > 1 {
            items.push(PageItem::Ellipsis);
        }
    }

    items.extend((start..=end).map(|index| PageItem::Page {
        index,
        active: index == current,
    }));

    if end < last {
        if end + 1 < last {
            items.push(PageItem::Ellipsis);
        }
        items.push(PageItem::Page {
            index: last,
            active: false,
        });
    }
    items
}

#[cfg(test)]
#[path = "tests/pagination_tests.rs"]
mod tests;
