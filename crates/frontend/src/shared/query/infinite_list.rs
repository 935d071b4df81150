use contracts::shared::CursorPage;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

use super::{InfiniteQuery, QueryClient, QueryKey};
use crate::shared::http::ApiError;

/// Reactive "load more" list. Loaded pages are mirrored into the query
/// cache under the list's key, so coming back to the same list within the
/// stale window shows them again without a request.
pub struct InfiniteList<P: 'static> {
    key: RwSignal<QueryKey>,
    state: RwSignal<InfiniteQuery<P>>,
}

impl<P: 'static> Clone for InfiniteList<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: 'static> Copy for InfiniteList<P> {}

impl<P> InfiniteList<P>
where
    P: CursorPage + Clone + Send + Sync + 'static,
{
    pub fn new(key: QueryKey, queries: &QueryClient) -> Self {
        Self {
            state: RwSignal::new(restore(&key, queries)),
            key: RwSignal::new(key),
        }
    }

    pub fn state(&self) -> RwSignal<InfiniteQuery<P>> {
        self.state
    }

    pub fn key(&self) -> QueryKey {
        self.key.get_untracked()
    }

    /// Point the list at another key (e.g. new filters): cached pages or empty
    pub fn switch_to(&self, key: QueryKey, queries: &QueryClient) {
        if self.key.get_untracked() == key {
            return;
        }
        self.state.set(restore(&key, queries));
        self.key.set(key);
    }

    /// Drop loaded pages and the cached copy
    pub fn reset(&self, queries: &QueryClient) {
        queries.remove(&self.key.get_untracked());
        self.state.update(InfiniteQuery::reset);
    }

    /// Fetch the following page unless one is running or the list is exhausted.
    /// A response that arrives after the key changed is discarded.
    pub fn load_more<F, Fut>(&self, queries: QueryClient, fetch: F)
    where
        F: FnOnce(Option<i64>) -> Fut + 'static,
        Fut: Future<Output = Result<P, ApiError>> + 'static,
    {
        let mut next = None;
        self.state.update(|q| next = q.begin_fetch());
        let Some(next) = next else {
            return;
        };
        let key = self.key.get_untracked();
        let (key_signal, state) = (self.key, self.state);
        spawn_local(async move {
            let result = fetch(next.cursor()).await;
            if key_signal.get_untracked() != key {
                log::debug!("query: dropping page for {:?}", key.segments());
                return;
            }
            match result {
                Ok(page) => {
                    state.update(|q| q.push_page(page));
                    queries.set_query_data(key, state.get_untracked());
                }
                Err(e) => {
                    log::warn!("query: page for {:?} failed: {}", key.segments(), e);
                    state.update(|q| q.fail(e.to_string()));
                }
            }
        });
    }
}

fn restore<P: CursorPage + Clone + 'static>(key: &QueryKey, queries: &QueryClient) -> InfiniteQuery<P> {
    if queries.is_fresh(key) {
        if let Some(cached) = queries.get_query_data::<InfiniteQuery<P>>(key) {
            return cached;
        }
    }
    InfiniteQuery::new()
}
