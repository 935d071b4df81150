//! Keyed cache for server reads.
//!
//! Entries stay fresh for a stale window; fresh entries are served without a
//! request. Invalidation marks every key under a prefix stale so the next read
//! refetches.

use chrono::{DateTime, Duration, Utc};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use crate::shared::clock::{system_clock, Clock};
use crate::shared::http::ApiError;

/// Hierarchical cache key, e.g. `["products", "42"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

struct QueryEntry {
    data: Rc<dyn Any>,
    updated_at: DateTime<Utc>,
    invalidated: bool,
}

#[derive(Clone)]
pub struct QueryClient {
    entries: Rc<RefCell<HashMap<QueryKey, QueryEntry>>>,
    stale_time: Duration,
    clock: Clock,
}

impl QueryClient {
    pub fn new(stale_time: Duration) -> Self {
        Self::with_clock(stale_time, system_clock())
    }

    pub fn with_clock(stale_time: Duration, clock: Clock) -> Self {
        Self {
            entries: Rc::new(RefCell::new(HashMap::new())),
            stale_time,
            clock,
        }
    }

    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        let now = (self.clock)();
        self.entries
            .borrow()
            .get(key)
            .map(|e| !e.invalidated && now - e.updated_at < self.stale_time)
            .unwrap_or(false)
    }

    /// Cached value regardless of freshness
    pub fn get_query_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.entries
            .borrow()
            .get(key)
            .and_then(|e| e.data.downcast_ref::<T>().cloned())
    }

    pub fn set_query_data<T: 'static>(&self, key: QueryKey, data: T) {
        let entry = QueryEntry {
            data: Rc::new(data),
            updated_at: (self.clock)(),
            invalidated: false,
        };
        self.entries.borrow_mut().insert(key, entry);
    }

    /// Edit a cached value in place. Returns the value before the edit so the
    /// caller can put it back on failure.
    pub fn update_query_data<T, F>(&self, key: &QueryKey, update: F) -> Option<T>
    where
        T: Clone + 'static,
        F: FnOnce(&mut T),
    {
        let previous = self.get_query_data::<T>(key)?;
        let mut next = previous.clone();
        update(&mut next);

        let mut entries = self.entries.borrow_mut();
        if let Some(entry) = entries.get_mut(key) {
            entry.data = Rc::new(next);
        }
        Some(previous)
    }

    /// Serve the cached value when fresh, otherwise run `fetcher` and cache its
    /// result. Failures leave the previous entry untouched.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Clone + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if self.is_fresh(&key) {
            if let Some(data) = self.get_query_data::<T>(&key) {
                return Ok(data);
            }
        }

        let data = fetcher().await?;
        self.set_query_data(key, data.clone());
        Ok(data)
    }

    /// Mark every entry under `prefix` stale. Returns how many were marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut marked = 0;
        for (key, entry) in self.entries.borrow_mut().iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                marked += 1;
            }
        }
        log::debug!("query: invalidated {} entries under {:?}", marked, prefix.segments());
        marked
    }

    pub fn remove(&self, key: &QueryKey) {
        self.entries.borrow_mut().remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::manual::ManualClock;
    use futures::executor::block_on;
    use std::cell::Cell;

    fn client(clock: &ManualClock) -> QueryClient {
        QueryClient::with_clock(Duration::minutes(5), clock.clock())
    }

    #[test]
    fn test_fresh_entry_skips_fetcher() {
        let clock = ManualClock::new();
        let client = client(&clock);
        let calls = Cell::new(0);
        let key = QueryKey::new(["posts", "1"]);

        let counter = &calls;
        let fetch = move || async move {
            counter.set(counter.get() + 1);
            Ok::<_, ApiError>(counter.get())
        };

        assert_eq!(block_on(client.fetch_query(key.clone(), fetch)), Ok(1));
        assert_eq!(block_on(client.fetch_query(key.clone(), fetch)), Ok(1));
        assert_eq!(calls.get(), 1);

        clock.advance(Duration::minutes(6));
        assert_eq!(block_on(client.fetch_query(key, fetch)), Ok(2));
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data() {
        let clock = ManualClock::new();
        let client = client(&clock);
        let key = QueryKey::new(["filters"]);
        client.set_query_data(key.clone(), vec![1, 2]);
        client.invalidate(&key);

        let result = block_on(client.fetch_query(key.clone(), || async {
            Err::<Vec<i32>, _>(ApiError::Network("offline".into()))
        }));
        assert!(result.is_err());
        assert_eq!(client.get_query_data::<Vec<i32>>(&key), Some(vec![1, 2]));
    }

    #[test]
    fn test_invalidate_by_prefix() {
        let clock = ManualClock::new();
        let client = client(&clock);
        client.set_query_data(QueryKey::new(["products", "1"]), 1);
        client.set_query_data(QueryKey::new(["products", "2"]), 2);
        client.set_query_data(QueryKey::new(["posts", "1"]), 3);

        assert_eq!(client.invalidate(&QueryKey::new(["products"])), 2);
        assert!(!client.is_fresh(&QueryKey::new(["products", "1"])));
        assert!(client.is_fresh(&QueryKey::new(["posts", "1"])));
    }

    #[test]
    fn test_update_query_data_returns_previous() {
        let clock = ManualClock::new();
        let client = client(&clock);
        let key = QueryKey::new(["products", "7"]);
        client.set_query_data(key.clone(), String::from("old"));

        let previous = client.update_query_data::<String, _>(&key, |v| v.push_str("+new"));
        assert_eq!(previous.as_deref(), Some("old"));
        assert_eq!(client.get_query_data::<String>(&key).as_deref(), Some("old+new"));

        assert_eq!(
            client.update_query_data::<String, _>(&QueryKey::new(["missing"]), |_| {}),
            None
        );
    }
}
