//! Cursor-based page walking over GraphQL connections.

use std::future::Future;

use tracing::debug;

use crate::{errors::Operation, models::Page, Error};

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;

/// Default and maximum number of entries requested per page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Fetches every page of a connection and concatenates the entries.
///
/// `fetch_page` is called with `None` for the first page and with the previous
/// page's end cursor afterwards, strictly one page at a time. The walk stops when a
/// page reports no next page. The first failing page aborts the walk and its error
/// is returned; entries already collected are dropped.
///
/// # Errors
///
/// Returns the error of the failing page, or `Error::InvalidResponse` when a page
/// claims a next page but has no end cursor.
///
/// # Example
///
/// ```rust
/// use github_client::{pagination::walk_pages, Error, Operation, Page};
///
/// # async fn example() -> Result<(), Error> {
/// let names = walk_pages(Operation::ListProtectedBranches, |cursor| async move {
///     Ok(match cursor.as_deref() {
///         None => Page::with_next(vec!["main"], "c1"),
///         _ => Page::last(vec!["feature/x"]),
///     })
/// })
/// .await?;
/// assert_eq!(names, vec!["main", "feature/x"]);
/// # Ok(())
/// # }
/// ```
pub async fn walk_pages<T, F, Fut>(operation: Operation, mut fetch_page: F) -> Result<Vec<T>, Error>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, Error>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut page_count = 0usize;

    loop {
        let page = fetch_page(cursor.take()).await?;
        page_count += 1;

        debug!(
            operation = %operation,
            page = page_count,
            entries = page.items.len(),
            has_next_page = page.has_next_page,
            "Fetched page"
        );

        items.extend(page.items);

        if !page.has_next_page {
            break;
        }

        match page.end_cursor {
            Some(end_cursor) => cursor = Some(end_cursor),
            None => return Err(Error::InvalidResponse { operation }),
        }
    }

    Ok(items)
}
