//! Leptos face of a [`ReferenceCache`]: the cache lives in local arena storage,
//! and a signal mirrors its snapshot so views re-render on every change.

use leptos::prelude::*;
use leptos::task::spawn_local;
use std::future::Future;

use super::http::ApiError;
use super::reference_cache::{CacheEntity, CacheSnapshot, ReferenceCache};

pub struct ReferenceStore<T: 'static> {
    cache: StoredValue<ReferenceCache<T>, LocalStorage>,
    snapshot: RwSignal<CacheSnapshot<T>>,
}

impl<T: 'static> Clone for ReferenceStore<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for ReferenceStore<T> {}

impl<T> ReferenceStore<T>
where
    T: CacheEntity + Send + Sync,
{
    pub fn new(cache: ReferenceCache<T>) -> Self {
        let snapshot = RwSignal::new(cache.snapshot());
        let observed = cache.clone();
        cache.subscribe(move || snapshot.set(observed.snapshot()));
        Self {
            cache: StoredValue::new_local(cache),
            snapshot,
        }
    }

    pub fn cache(&self) -> ReferenceCache<T> {
        self.cache.get_value()
    }

    pub fn snapshot(&self) -> RwSignal<CacheSnapshot<T>> {
        self.snapshot
    }

    pub fn items(&self) -> Vec<T> {
        self.snapshot
            .with(|s| s.items.iter().map(|e| e.item.clone()).collect())
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.snapshot.with(|s| s.get(id).cloned())
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.with(|s| s.loading)
    }

    pub fn error(&self) -> Option<String> {
        self.snapshot.with(|s| s.error.clone())
    }

    /// Fire-and-forget `fetch`; errors land in the snapshot
    pub fn fetch(&self) {
        let cache = self.cache();
        spawn_local(async move {
            let _ = cache.fetch().await;
        });
    }

    pub fn reload(&self) {
        let cache = self.cache();
        spawn_local(async move {
            let _ = cache.reload().await;
        });
    }

    pub fn clear_error(&self) {
        self.cache().clear_error();
    }

    /// Hide `id` at once, then delete on the server; the row comes back if that fails
    pub async fn remove_optimistic<Fut>(&self, id: &str, request: Fut) -> Result<(), ApiError>
    where
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let cache = self.cache();
        let Some(ticket) = cache.begin_remove(id) else {
            return Err(ApiError::NotFound);
        };
        cache
            .apply_optimistic(ticket, async move { request.await.map(|_| None) })
            .await
    }
}
