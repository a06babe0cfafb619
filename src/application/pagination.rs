//! Page-number pagination for listing pages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Blog,
    Notes,
    Other,
}

/// Page sizes per listing kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub blog_entries_per_page: usize,
    pub notes_page_size: usize,
    pub default_page_size: usize,
}

impl PaginationSettings {
    pub fn page_size(&self, kind: PageKind) -> usize {
        match kind {
            PageKind::Blog => self.blog_entries_per_page,
            PageKind::Notes => self.notes_page_size,
            PageKind::Other => self.default_page_size,
        }
    }

    pub fn kind_of(collection: &str) -> PageKind {
        match collection {
            "blog" => PageKind::Blog,
            "notes" => PageKind::Notes,
            _ => PageKind::Other,
        }
    }
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            blog_entries_per_page: 10,
            notes_page_size: 10,
            default_page_size: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Paginated<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slice `items` into page `page` of `size`. Page 0 is treated as page 1 and
/// pages past the end carry no items.
pub fn paginate<T>(items: Vec<T>, page: usize, size: usize) -> Paginated<T> {
    let size = size.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(size);

    let items = items
        .into_iter()
        .skip((page - 1).saturating_mul(size))
        .take(size)
        .collect();

    Paginated {
        items,
        page,
        total_pages,
        total_items,
    }
}
