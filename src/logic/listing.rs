//! Search, status filter and pagination over the in-memory collection.

use crate::models::TournamentRecord;
use serde::Serialize;

/// Records matching `query` (case-insensitive, in title, subtitle or
/// difficulty) and `status_filter` (exact). Empty strings disable a predicate.
pub fn filter_records<'a>(
    records: &'a [TournamentRecord],
    query: &str,
    status_filter: &str,
) -> Vec<&'a TournamentRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(|t| query.is_empty() || matches_query(t, &query))
        .filter(|t| status_filter.is_empty() || t.status.as_str() == status_filter)
        .collect()
}

fn matches_query(t: &TournamentRecord, lowered: &str) -> bool {
    [t.title.as_str(), t.subtitle.as_str(), t.difficulty.as_str()]
        .iter()
        .any(|field| field.to_lowercase().contains(lowered))
}

/// One page (1-based) of `items`. Page 0 is read as page 1; pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// An entry in the page-number strip.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// Page numbers to show: first, last and current±1, with an ellipsis
/// standing in at current±2 when there is a gap.
pub fn page_window(current: usize, total_pages: usize) -> Vec<PageItem> {
    let mut items = Vec::new();
    for i in 1..=total_pages {
        let near = i + 1 >= current && i <= current + 1;
        if i == 1 || i == total_pages || near {
            items.push(PageItem::Page {
                number: i,
                current: i == current,
            });
        } else if i + 2 == current || i == current + 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items
}

/// State of the pagination controls for one render.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Pagination {
    pub current: usize,
    pub total_pages: usize,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub items: Vec<PageItem>,
}

impl Pagination {
    pub fn new(current: usize, total_items: usize, page_size: usize) -> Self {
        let total_pages = page_count(total_items, page_size);
        Self {
            current,
            total_pages,
            prev_disabled: current <= 1,
            next_disabled: total_pages == 0 || current >= total_pages,
            items: page_window(current, total_pages),
        }
    }
}
