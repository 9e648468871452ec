// Cursor-driven pagination over listing endpoints.
//
// A listing call takes an optional continuation token and returns one page
// of items plus the token for the next page. `paginate` turns such a call
// into a lazy iterator that only fetches the next page once the buffered
// one has been consumed.

use std::collections::VecDeque;

use crate::error::PlaylistError;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Token for the following page; `None` on the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Iterator returned by `paginate`.
///
/// Yields every item of every page in page order. A failed fetch is yielded
/// once as `Err` and ends the iteration; nothing is retried.
pub struct Paginator<T, F> {
    fetch: F,
    buffered: VecDeque<T>,
    cursor: Cursor,
    pages_fetched: usize,
}

/// Start a fresh listing from the first page.
pub fn paginate<T, F>(fetch: F) -> Paginator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, PlaylistError>,
{
    Paginator {
        fetch,
        buffered: VecDeque::new(),
        cursor: Cursor::Start,
        pages_fetched: 0,
    }
}

impl<T, F> Paginator<T, F> {
    /// Number of remote page fetches issued so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

impl<T, F> Iterator for Paginator<T, F>
where
    F: FnMut(Option<&str>) -> Result<Page<T>, PlaylistError>,
{
    type Item = Result<T, PlaylistError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.buffered.pop_front() {
                return Some(Ok(item));
            }

            let result = match &self.cursor {
                Cursor::Start => (self.fetch)(None),
                Cursor::Next(token) => (self.fetch)(Some(token.as_str())),
                Cursor::Done => return None,
            };
            self.pages_fetched += 1;

            match result {
                Ok(page) => {
                    // An empty token is treated like a missing one.
                    self.cursor = match page.next_cursor.filter(|t| !t.is_empty()) {
                        Some(token) => Cursor::Next(token),
                        None => Cursor::Done,
                    };
                    self.buffered.extend(page.items);
                }
                Err(e) => {
                    self.cursor = Cursor::Done;
                    self.buffered.clear();
                    return Some(Err(e));
                }
            }
        }
    }
}
