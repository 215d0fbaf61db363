//! Page slicing of the filtered view for the listing table.

use serde::Serialize;

pub const DEFAULT_ITEMS_PER_PAGE: usize = 25;

fn get_pages(
    total_pages: usize,
    current_page: usize,
    left_edge: usize,
    left_current: usize,
    right_current: usize,
    right_edge: usize,
) -> Vec<Option<usize>> {
    let last_page = total_pages;

    if last_page == 0 {
        return vec![];
    }

    let mut pages = Vec::new();

    let left_end = (1 + left_edge).min(last_page + 1);
    pages.extend((1..left_end).map(Some));

    let mid_start = left_end.max(current_page.saturating_sub(left_current));
    let mid_end = (current_page + right_current + 1).min(last_page + 1);

    if mid_start > left_end {
        pages.push(None);
    }
    pages.extend((mid_start..mid_end).map(Some));

    let right_start = mid_end.max(last_page.saturating_sub(right_edge) + 1);

    if right_start > mid_end {
        pages.push(None);
    }
    pages.extend((right_start..=last_page).map(Some));

    pages
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages: Vec<Option<usize>>,
    pub page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total_pages: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };

        let pages = get_pages(total_pages, current_page, 2, 2, 4, 2);

        Self {
            items,
            pages,
            page: current_page,
        }
    }
}

impl<T> Paginated<T> {
    /// Cuts `page` out of the full list; out-of-range pages show the last one.
    pub fn from_items(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let total_pages = all.len().div_ceil(per_page);
        let page = page.clamp(1, total_pages.max(1));
        let items = all
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();
        Self::new(items, page, total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_links_collapse_with_gaps() {
        assert_eq!(get_pages(0, 1, 2, 2, 4, 2), vec![]);
        assert_eq!(
            get_pages(3, 1, 2, 2, 4, 2),
            vec![Some(1), Some(2), Some(3)]
        );
        let pages = get_pages(20, 10, 2, 2, 4, 2);
        assert_eq!(pages.first(), Some(&Some(1)));
        assert!(pages.contains(&None));
        assert_eq!(pages.last(), Some(&Some(20)));
    }

    #[test]
    fn slices_the_requested_page() {
        let page = Paginated::from_items((1..=7).collect(), 2, 3);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn out_of_range_page_shows_the_last_one() {
        let page = Paginated::from_items((1..=7).collect(), 9, 3);
        assert_eq!(page.items, vec![7]);
        assert_eq!(page.page, 3);

        let empty = Paginated::<i32>::from_items(Vec::new(), 4, 3);
        assert!(empty.items.is_empty());
        assert_eq!(empty.page, 1);
    }
}
