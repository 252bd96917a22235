//! Ordering and pagination shared by the list operations.
//!
//! These are pure functions over an already-filtered candidate set.

use crate::filter::{Page, SortOrder};
use crate::model::Account;

/// Order accounts by post count, ties broken by id ascending.
pub fn sort_by_post_count(accounts: &mut [Account], order: SortOrder) {
    accounts.sort_by(|a, b| {
        let by_count = match order {
            SortOrder::Asc => a.post_count.cmp(&b.post_count),
            SortOrder::Desc => b.post_count.cmp(&a.post_count),
        };
        by_count.then_with(|| a.id.cmp(&b.id))
    });
}

/// Slice out `page` from `items`, clamping out-of-range windows.
///
/// An offset at or past the end yields an empty vector; a window that runs
/// past the end yields everything from `offset` onward.
pub fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
    if page.offset >= items.len() {
        return Vec::new();
    }
    items
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .collect()
}
