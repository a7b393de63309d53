//! List helpers: pagination over ordered collections

/// One page of an ordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
    pub items: &'a [T],
}

impl<T> Page<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Slice out page `number` (1-based). Pages past the end are empty; a
/// `per_page` of zero puts everything on one page.
pub fn paginate<T>(items: &[T], per_page: usize, number: usize) -> Page<'_, T> {
    let number = number.max(1);
    if per_page == 0 {
        return Page {
            number,
            total_pages: 1,
            items: if number == 1 { items } else { &[] },
        };
    }

    let total_pages = items.len().div_ceil(per_page).max(1);
    let start = (number - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());

    Page {
        number,
        total_pages,
        items: &items[start..end],
    }
}
