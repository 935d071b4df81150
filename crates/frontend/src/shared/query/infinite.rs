use contracts::shared::CursorPage;
use std::future::Future;

use crate::shared::http::ApiError;

/// Pages of a cursor-paginated list, in load order.
///
/// A page's `next_cursor` is the cursor for the following request; a page
/// without one ends the list.
#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteQuery<P> {
    pages: Vec<P>,
    loading: bool,
    error: Option<String>,
}

impl<P> Default for InfiniteQuery<P> {
    fn default() -> Self {
        Self {
            pages: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// What the next request should ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    First,
    After(i64),
}

impl NextPage {
    pub fn cursor(self) -> Option<i64> {
        match self {
            NextPage::First => None,
            NextPage::After(cursor) => Some(cursor),
        }
    }
}

impl<P: CursorPage> InfiniteQuery<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[P] {
        &self.pages
    }

    pub fn items(&self) -> impl Iterator<Item = &P::Item> {
        self.pages.iter().flat_map(|p| p.items().iter())
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(|p| p.items().len()).sum()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_started(&self) -> bool {
        !self.pages.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        match self.pages.last() {
            None => true,
            Some(page) => page.next_cursor().is_some(),
        }
    }

    /// `None` when the list is exhausted or a request is already running
    pub fn next_request(&self) -> Option<NextPage> {
        if self.loading {
            return None;
        }
        match self.pages.last() {
            None => Some(NextPage::First),
            Some(page) => page.next_cursor().map(NextPage::After),
        }
    }

    /// Claim the next request. Returns what to fetch, or `None` if there is nothing to do.
    pub fn begin_fetch(&mut self) -> Option<NextPage> {
        let next = self.next_request()?;
        self.loading = true;
        self.error = None;
        Some(next)
    }

    pub fn push_page(&mut self, page: P) {
        self.pages.push(page);
        self.loading = false;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.loading = false;
        self.error = Some(error.into());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Request and append the next page. `Ok(false)` when there was nothing to load.
    pub async fn fetch_next_page<F, Fut>(&mut self, fetcher: F) -> Result<bool, ApiError>
    where
        F: FnOnce(Option<i64>) -> Fut,
        Fut: Future<Output = Result<P, ApiError>>,
    {
        let Some(next) = self.begin_fetch() else {
            return Ok(false);
        };
        match fetcher(next.cursor()).await {
            Ok(page) => {
                self.push_page(page);
                Ok(true)
            }
            Err(e) => {
                self.fail(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Page {
        items: Vec<u32>,
        next: Option<i64>,
    }

    impl CursorPage for Page {
        type Item = u32;

        fn items(&self) -> &[u32] {
            &self.items
        }

        fn next_cursor(&self) -> Option<i64> {
            self.next
        }
    }

    #[test]
    fn test_cursor_chain() {
        let mut query = InfiniteQuery::<Page>::new();
        assert!(query.has_next_page());
        assert_eq!(query.begin_fetch(), Some(NextPage::First));
        // already running
        assert_eq!(query.begin_fetch(), None);

        query.push_page(Page { items: vec![1, 2], next: Some(12) });
        assert_eq!(query.begin_fetch(), Some(NextPage::After(12)));
        query.push_page(Page { items: vec![3], next: None });

        assert!(!query.has_next_page());
        assert_eq!(query.begin_fetch(), None);
        assert_eq!(query.items().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(query.item_count(), 3);
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut query = InfiniteQuery::<Page>::new();
        query.begin_fetch();
        query.fail("offline");
        assert_eq!(query.error(), Some("offline"));
        assert_eq!(query.begin_fetch(), Some(NextPage::First));
        assert_eq!(query.error(), None);
    }

    #[test]
    fn test_fetch_next_page_passes_cursor() {
        let mut query = InfiniteQuery::<Page>::new();
        let mut seen = Vec::new();

        let loaded = futures::executor::block_on(query.fetch_next_page(|cursor| {
            seen.push(cursor);
            async { Ok(Page { items: vec![1], next: Some(5) }) }
        }));
        assert_eq!(loaded, Ok(true));

        let loaded = futures::executor::block_on(query.fetch_next_page(|cursor| {
            seen.push(cursor);
            async { Err(ApiError::Network("offline".into())) }
        }));
        assert!(loaded.is_err());
        assert_eq!(query.error(), Some("Failed to send request: offline"));
        assert_eq!(seen, vec![None, Some(5)]);
        assert_eq!(query.item_count(), 1);
    }

    #[test]
    fn test_reset() {
        let mut query = InfiniteQuery::<Page>::new();
        query.begin_fetch();
        query.push_page(Page { items: vec![1], next: None });
        query.reset();
        assert!(!query.is_started());
        assert_eq!(NextPage::After(4).cursor(), Some(4));
        assert_eq!(query.next_request().and_then(NextPage::cursor), None);
    }
}
