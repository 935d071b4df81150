//! Client-side cache of a reference collection (locations, roads).
//!
//! One instance owns the collection for the whole session:
//! - `fetch` is a no-op while data is younger than the TTL and non-empty;
//!   callers arriving during a request wait on the same request;
//! - a failed request keeps whatever was cached and records the error;
//! - edits are either direct (`add`, `update`, `remove`) or optimistic with an
//!   explicit ticket that is confirmed or rolled back once the server answers;
//! - the visible items and the fetch time are persisted, so a reload inside the
//!   TTL does not hit the network.

use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use super::clock::{system_clock, Clock};
use super::http::ApiError;
use super::storage::PersistTarget;

pub const DEFAULT_TTL_MINUTES: i64 = 30;

/// Items the cache can hold: identified by a server-issued id
pub trait CacheEntity: Clone + Serialize + DeserializeOwned + 'static {
    fn cache_id(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Confirmed,
    PendingCreate,
    PendingUpdate,
    /// Hidden from readers until confirmed (dropped) or rolled back (shown again)
    PendingRemove,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub item: T,
    pub status: EntryStatus,
}

impl<T> CacheEntry<T> {
    fn confirmed(item: T) -> Self {
        Self {
            item,
            status: EntryStatus::Confirmed,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status != EntryStatus::Confirmed
    }

    fn is_visible(&self) -> bool {
        self.status != EntryStatus::PendingRemove
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Mutation<T> {
    Create,
    Update { previous: T },
    Remove,
}

/// Handle for one optimistic change. Consumed by `confirm` or `rollback`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "an optimistic change must be confirmed or rolled back"]
pub struct MutationTicket<T> {
    id: String,
    mutation: Mutation<T>,
}

impl<T> MutationTicket<T> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// What readers see
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot<T> {
    pub items: Vec<CacheEntry<T>>,
    pub loading: bool,
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
}

impl<T> Default for CacheSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            last_fetched: None,
        }
    }
}

impl<T: CacheEntity> CacheSnapshot<T> {
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items
            .iter()
            .map(|e| &e.item)
            .find(|item| item.cache_id() == id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.items
            .iter()
            .any(|e| e.item.cache_id() == id && e.is_pending())
    }
}

/// Persisted form: `{"items": [...], "lastFetched": <epoch millis>}`
#[derive(Serialize, Deserialize)]
struct PersistedCache<T> {
    items: Vec<T>,
    #[serde(rename = "lastFetched", default)]
    last_fetched: Option<i64>,
}

struct CacheState<T> {
    entries: Vec<CacheEntry<T>>,
    loading: bool,
    error: Option<String>,
    last_fetched: Option<DateTime<Utc>>,
}

impl<T: CacheEntity> CacheState<T> {
    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.item.cache_id() == id)
    }

    fn visible_position(&self, id: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.is_visible() && e.item.cache_id() == id)
    }

    fn has_visible(&self) -> bool {
        self.entries.iter().any(CacheEntry::is_visible)
    }

    fn upsert(&mut self, item: T) {
        match self.position(item.cache_id()) {
            Some(i) => self.entries[i] = CacheEntry::confirmed(item),
            None => self.entries.push(CacheEntry::confirmed(item)),
        }
    }

    /// Take a fresh server list without losing changes that are still in flight.
    /// Pending removals stay hidden, tentative updates stay shown, and pending
    /// creations are kept after the fetched rows.
    fn merge_fetched(&mut self, items: Vec<T>) {
        let previous = std::mem::take(&mut self.entries);
        let pending_for = |id: &str| {
            previous
                .iter()
                .find(|e| e.is_pending() && e.status != EntryStatus::PendingCreate && e.item.cache_id() == id)
        };

        let mut merged: Vec<CacheEntry<T>> = items
            .into_iter()
            .map(|item| match pending_for(item.cache_id()) {
                Some(entry) if entry.status == EntryStatus::PendingUpdate => entry.clone(),
                Some(entry) => CacheEntry {
                    item,
                    status: entry.status,
                },
                None => CacheEntry::confirmed(item),
            })
            .collect();

        let creations: Vec<CacheEntry<T>> = previous
            .into_iter()
            .filter(|e| e.status == EntryStatus::PendingCreate)
            .filter(|e| !merged.iter().any(|m| m.item.cache_id() == e.item.cache_id()))
            .collect();
        merged.extend(creations);
        self.entries = merged;
    }
}

type FetchFuture<T> = LocalBoxFuture<'static, Result<Vec<T>, ApiError>>;
type Fetcher<T> = Rc<dyn Fn() -> FetchFuture<T>>;
type InFlight = Shared<LocalBoxFuture<'static, Result<(), String>>>;
type Listener = Rc<dyn Fn()>;

pub struct ReferenceCache<T> {
    name: &'static str,
    state: Rc<RefCell<CacheState<T>>>,
    in_flight: Rc<RefCell<Option<InFlight>>>,
    fetcher: Fetcher<T>,
    clock: Clock,
    ttl: Duration,
    persist: Option<PersistTarget>,
    listeners: Rc<RefCell<Vec<Listener>>>,
}

impl<T> Clone for ReferenceCache<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            state: Rc::clone(&self.state),
            in_flight: Rc::clone(&self.in_flight),
            fetcher: Rc::clone(&self.fetcher),
            clock: Rc::clone(&self.clock),
            ttl: self.ttl,
            persist: self.persist.clone(),
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<T: CacheEntity> ReferenceCache<T> {
    /// `name` is used in log lines and the default error message
    pub fn new<F, Fut>(name: &'static str, fetcher: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<Vec<T>, ApiError>> + 'static,
    {
        Self {
            name,
            state: Rc::new(RefCell::new(CacheState {
                entries: Vec::new(),
                loading: false,
                error: None,
                last_fetched: None,
            })),
            in_flight: Rc::new(RefCell::new(None)),
            fetcher: Rc::new(move || fetcher().boxed_local()),
            clock: system_clock(),
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            persist: None,
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Restore from `target` (if anything usable is stored) and keep it updated
    pub fn with_persistence(mut self, target: PersistTarget) -> Self {
        if let Some(saved) = target.load::<PersistedCache<T>>() {
            let mut state = self.state.borrow_mut();
            state.entries = saved.items.into_iter().map(CacheEntry::confirmed).collect();
            state.last_fetched = saved
                .last_fetched
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single());
            log::debug!("{}: restored {} items", self.name, state.entries.len());
        }
        self.persist = Some(target);
        self
    }

    /// Called after every state change
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    fn persist(&self) {
        let Some(target) = &self.persist else {
            return;
        };
        let snapshot = {
            let state = self.state.borrow();
            PersistedCache {
                items: state
                    .entries
                    .iter()
                    .filter(|e| e.is_visible() && e.status != EntryStatus::PendingCreate)
                    .map(|e| e.item.clone())
                    .collect(),
                last_fetched: state.last_fetched.map(|t| t.timestamp_millis()),
            }
        };
        target.save(&snapshot);
    }

    fn changed(&self) {
        self.persist();
        self.notify();
    }

    // ===== Reads =====

    pub fn snapshot(&self) -> CacheSnapshot<T> {
        let state = self.state.borrow();
        CacheSnapshot {
            items: state
                .entries
                .iter()
                .filter(|e| e.is_visible())
                .cloned()
                .collect(),
            loading: state.loading,
            error: state.error.clone(),
            last_fetched: state.last_fetched,
        }
    }

    pub fn items(&self) -> Vec<T> {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.is_visible())
            .map(|e| e.item.clone())
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<T> {
        let state = self.state.borrow();
        state
            .visible_position(id)
            .map(|i| state.entries[i].item.clone())
    }

    pub fn len(&self) -> usize {
        self.state
            .borrow()
            .entries
            .iter()
            .filter(|e| e.is_visible())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Non-empty and fetched within the TTL
    pub fn is_fresh(&self) -> bool {
        let now = (self.clock)();
        let state = self.state.borrow();
        match state.last_fetched {
            Some(at) => state.has_visible() && now - at < self.ttl,
            None => false,
        }
    }

    // ===== Loading =====

    /// Load the collection unless it is fresh. Concurrent callers share one request.
    pub async fn fetch(&self) -> Result<(), String> {
        let pending = self.in_flight.borrow().clone();
        if let Some(pending) = pending {
            return pending.await;
        }
        if self.is_fresh() {
            log::debug!("{}: using cached data", self.name);
            return Ok(());
        }
        let request = self.start_request();
        request.await
    }

    /// Load regardless of freshness. Joins a request that is already running.
    pub async fn reload(&self) -> Result<(), String> {
        self.state.borrow_mut().last_fetched = None;
        self.fetch().await
    }

    fn start_request(&self) -> InFlight {
        {
            let mut state = self.state.borrow_mut();
            state.loading = true;
            state.error = None;
        }
        self.notify();

        let this = self.clone();
        let request = async move {
            let started = (this.clock)();
            let response = (this.fetcher)().await;
            let outcome = match response {
                Ok(items) => {
                    log::info!("{}: loaded {} items", this.name, items.len());
                    let mut state = this.state.borrow_mut();
                    state.merge_fetched(items);
                    state.last_fetched = Some(started);
                    state.loading = false;
                    state.error = None;
                    Ok(())
                }
                Err(e) => {
                    log::error!("{}: fetch failed: {}", this.name, e);
                    let message = format!("Failed to load {}.", this.name);
                    let mut state = this.state.borrow_mut();
                    state.loading = false;
                    state.error = Some(message.clone());
                    Err(message)
                }
            };
            this.in_flight.borrow_mut().take();
            this.changed();
            outcome
        }
        .boxed_local()
        .shared();

        *self.in_flight.borrow_mut() = Some(request.clone());
        request
    }

    // ===== Direct edits =====

    /// Insert, or replace the entry with the same id
    pub fn add(&self, item: T) {
        self.state.borrow_mut().upsert(item);
        self.changed();
    }

    pub fn add_many(&self, items: impl IntoIterator<Item = T>) {
        {
            let mut state = self.state.borrow_mut();
            for item in items {
                state.upsert(item);
            }
        }
        self.changed();
    }

    /// Replace the entry with `id`. Returns false if there is none.
    pub fn update(&self, id: &str, item: T) -> bool {
        let replaced = {
            let mut state = self.state.borrow_mut();
            match state.visible_position(id) {
                Some(i) => {
                    state.entries[i] = CacheEntry::confirmed(item);
                    true
                }
                None => false,
            }
        };
        if replaced {
            self.changed();
        }
        replaced
    }

    /// Replace every listed item that is present; others are ignored
    pub fn update_many(&self, items: impl IntoIterator<Item = T>) -> usize {
        let mut replaced = 0;
        {
            let mut state = self.state.borrow_mut();
            for item in items {
                if let Some(i) = state.visible_position(item.cache_id()) {
                    state.entries[i] = CacheEntry::confirmed(item);
                    replaced += 1;
                }
            }
        }
        if replaced > 0 {
            self.changed();
        }
        replaced
    }

    /// Drop the entry immediately. There is no way back if the server then refuses.
    pub fn remove(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            match state.position(id) {
                Some(i) => {
                    state.entries.remove(i);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.changed();
        }
        removed
    }

    pub fn clear_error(&self) {
        self.state.borrow_mut().error = None;
        self.notify();
    }

    // ===== Optimistic edits =====

    /// Show `tentative` right away under its (temporary) id
    pub fn begin_create(&self, tentative: T) -> MutationTicket<T> {
        let id = tentative.cache_id().to_string();
        self.state.borrow_mut().entries.push(CacheEntry {
            item: tentative,
            status: EntryStatus::PendingCreate,
        });
        self.notify();
        MutationTicket {
            id,
            mutation: Mutation::Create,
        }
    }

    pub fn begin_update(&self, id: &str, tentative: T) -> Option<MutationTicket<T>> {
        let previous = {
            let mut state = self.state.borrow_mut();
            let i = state.visible_position(id)?;
            let entry = &mut state.entries[i];
            let previous = std::mem::replace(&mut entry.item, tentative);
            if entry.status == EntryStatus::Confirmed {
                entry.status = EntryStatus::PendingUpdate;
            }
            previous
        };
        self.notify();
        Some(MutationTicket {
            id: id.to_string(),
            mutation: Mutation::Update { previous },
        })
    }

    pub fn begin_remove(&self, id: &str) -> Option<MutationTicket<T>> {
        {
            let mut state = self.state.borrow_mut();
            let i = state.visible_position(id)?;
            state.entries[i].status = EntryStatus::PendingRemove;
        }
        self.notify();
        Some(MutationTicket {
            id: id.to_string(),
            mutation: Mutation::Remove,
        })
    }

    /// Server accepted the change. `server_item`, when given, replaces the tentative item.
    pub fn confirm(&self, ticket: MutationTicket<T>, server_item: Option<T>) {
        {
            let mut state = self.state.borrow_mut();
            match ticket.mutation {
                Mutation::Create => {
                    let pending = state.entries.iter().position(|e| {
                        e.status == EntryStatus::PendingCreate && e.item.cache_id() == ticket.id
                    });
                    match (pending, server_item) {
                        (Some(i), Some(item)) => {
                            state.entries.remove(i);
                            state.upsert(item);
                        }
                        (Some(i), None) => state.entries[i].status = EntryStatus::Confirmed,
                        (None, Some(item)) => state.upsert(item),
                        (None, None) => {}
                    }
                }
                Mutation::Update { .. } => {
                    if let Some(i) = state.visible_position(&ticket.id) {
                        let entry = &mut state.entries[i];
                        if let Some(item) = server_item {
                            entry.item = item;
                        }
                        entry.status = EntryStatus::Confirmed;
                    }
                }
                Mutation::Remove => {
                    state.entries.retain(|e| {
                        !(e.status == EntryStatus::PendingRemove && e.item.cache_id() == ticket.id)
                    });
                }
            }
        }
        self.changed();
    }

    /// Server refused the change: put back what was there before
    pub fn rollback(&self, ticket: MutationTicket<T>) {
        {
            let mut state = self.state.borrow_mut();
            match ticket.mutation {
                Mutation::Create => {
                    state.entries.retain(|e| {
                        !(e.status == EntryStatus::PendingCreate && e.item.cache_id() == ticket.id)
                    });
                }
                Mutation::Update { previous } => {
                    if let Some(i) = state.visible_position(&ticket.id) {
                        state.entries[i] = CacheEntry::confirmed(previous);
                    }
                }
                Mutation::Remove => {
                    let hidden = state.entries.iter_mut().find(|e| {
                        e.status == EntryStatus::PendingRemove && e.item.cache_id() == ticket.id
                    });
                    if let Some(entry) = hidden {
                        entry.status = EntryStatus::Confirmed;
                    }
                }
            }
        }
        self.changed();
    }

    /// Await the server call behind `ticket`; confirm on success, roll back and
    /// record the error on failure.
    pub async fn apply_optimistic<Fut>(&self, ticket: MutationTicket<T>, request: Fut) -> Result<(), ApiError>
    where
        Fut: Future<Output = Result<Option<T>, ApiError>>,
    {
        match request.await {
            Ok(server_item) => {
                self.confirm(ticket, server_item);
                Ok(())
            }
            Err(e) => {
                log::warn!("{}: rolling back {}: {}", self.name, ticket.id(), e);
                self.state.borrow_mut().error = Some(e.to_string());
                self.rollback(ticket);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::clock::manual::ManualClock;
    use crate::shared::storage::{KeyValueStorage, MemoryStorage};
    use futures::channel::oneshot;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: String,
        name: String,
    }

    impl CacheEntity for Item {
        fn cache_id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn counting_cache(calls: Rc<Cell<u32>>, clock: &ManualClock) -> ReferenceCache<Item> {
        ReferenceCache::new("items", move || {
            calls.set(calls.get() + 1);
            async { Ok::<_, ApiError>(vec![item("1", "Pagoda"), item("2", "Market")]) }
        })
        .with_clock(clock.clock())
    }

    #[test]
    fn test_fetch_is_noop_while_fresh() {
        let calls = Rc::new(Cell::new(0));
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::clone(&calls), &clock);

        assert_eq!(block_on(cache.fetch()), Ok(()));
        assert_eq!(block_on(cache.fetch()), Ok(()));
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(), 2);

        clock.advance(Duration::minutes(29));
        block_on(cache.fetch()).unwrap();
        assert_eq!(calls.get(), 1);

        clock.advance(Duration::minutes(2));
        block_on(cache.fetch()).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_empty_cache_is_never_fresh() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let clock = ManualClock::new();
        let cache: ReferenceCache<Item> = ReferenceCache::new("items", move || {
            counter.set(counter.get() + 1);
            async { Ok::<_, ApiError>(Vec::new()) }
        })
        .with_clock(clock.clock());

        block_on(cache.fetch()).unwrap();
        block_on(cache.fetch()).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_reload_bypasses_freshness() {
        let calls = Rc::new(Cell::new(0));
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::clone(&calls), &clock);

        block_on(cache.fetch()).unwrap();
        block_on(cache.reload()).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_concurrent_fetches_share_one_request() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let (tx, rx) = oneshot::channel::<Vec<Item>>();
        let rx = Rc::new(RefCell::new(Some(rx)));

        let cache: ReferenceCache<Item> = ReferenceCache::new("items", move || {
            counter.set(counter.get() + 1);
            let rx = rx.borrow_mut().take();
            async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| ApiError::Network("cancelled".into())),
                    None => Err(ApiError::Network("second request".into())),
                }
            }
        });

        let results = Rc::new(RefCell::new(Vec::new()));
        let mut pool = LocalPool::new();
        for _ in 0..3 {
            let cache = cache.clone();
            let results = Rc::clone(&results);
            pool.spawner()
                .spawn_local(async move {
                    let outcome = cache.fetch().await;
                    results.borrow_mut().push(outcome);
                })
                .unwrap();
        }

        pool.run_until_stalled();
        assert_eq!(calls.get(), 1);
        assert!(cache.is_loading());
        assert!(results.borrow().is_empty());

        tx.send(vec![item("1", "Pagoda")]).unwrap();
        pool.run_until_stalled();

        assert_eq!(calls.get(), 1);
        assert_eq!(*results.borrow(), vec![Ok(()), Ok(()), Ok(())]);
        assert!(!cache.is_loading());
        assert_eq!(cache.items(), vec![item("1", "Pagoda")]);
    }

    #[test]
    fn test_failed_fetch_keeps_items_and_sets_error() {
        let fail = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fail);
        let cache: ReferenceCache<Item> = ReferenceCache::new("locations", move || {
            let fail = flag.get();
            async move {
                if fail {
                    Err(ApiError::Network("offline".into()))
                } else {
                    Ok(vec![item("1", "Pagoda")])
                }
            }
        });

        block_on(cache.fetch()).unwrap();
        fail.set(true);
        let result = block_on(cache.reload());

        assert_eq!(result, Err("Failed to load locations.".to_string()));
        assert_eq!(cache.error().as_deref(), Some("Failed to load locations."));
        assert_eq!(cache.items(), vec![item("1", "Pagoda")]);
        assert!(!cache.is_loading());

        cache.clear_error();
        assert_eq!(cache.error(), None);
    }

    #[test]
    fn test_direct_edits() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        block_on(cache.fetch()).unwrap();

        cache.add(item("3", "School"));
        // same id replaces
        cache.add(item("3", "High School"));
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("3"), Some(item("3", "High School")));

        assert!(cache.update("1", item("1", "Shwe Pagoda")));
        assert!(!cache.update("9", item("9", "Nowhere")));
        assert_eq!(cache.update_many(vec![item("2", "Night Market"), item("8", "x")]), 1);

        assert!(cache.remove("3"));
        assert!(!cache.remove("3"));
        assert_eq!(
            cache.items(),
            vec![item("1", "Shwe Pagoda"), item("2", "Night Market")]
        );

        cache.add_many(vec![item("4", "Temple"), item("5", "Hospital")]);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_optimistic_remove_rolls_back_on_failure() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        block_on(cache.fetch()).unwrap();

        let ticket = cache.begin_remove("1").unwrap();
        assert_eq!(cache.get("1"), None);
        assert_eq!(cache.len(), 1);

        let result = block_on(cache.apply_optimistic(ticket, async {
            Err(ApiError::Http {
                status: 500,
                message: "delete failed".into(),
            })
        }));
        assert!(result.is_err());
        assert_eq!(cache.get("1"), Some(item("1", "Pagoda")));
        assert_eq!(cache.items()[0], item("1", "Pagoda"));
        assert_eq!(cache.error().as_deref(), Some("delete failed"));
    }

    #[test]
    fn test_optimistic_remove_confirmed() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        block_on(cache.fetch()).unwrap();

        let ticket = cache.begin_remove("2").unwrap();
        cache.confirm(ticket, None);
        assert_eq!(cache.items(), vec![item("1", "Pagoda")]);
        assert!(cache.begin_remove("2").is_none());
    }

    #[test]
    fn test_plain_remove_does_not_come_back_after_server_failure() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        block_on(cache.fetch()).unwrap();

        let deletes = Rc::new(Cell::new(0));
        let delete_request = |_id: &str| {
            deletes.set(deletes.get() + 1);
            async { Err::<(), _>(ApiError::Network("offline".into())) }
        };

        assert!(cache.remove("1"));
        let sent = block_on(delete_request("1"));
        assert!(matches!(sent, Err(ApiError::Network(_))));
        assert_eq!(deletes.get(), 1);
        // cache and server now disagree until the next reload
        assert_eq!(cache.get("1"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.error(), None);

        block_on(cache.reload()).unwrap();
        assert_eq!(cache.get("1"), Some(item("1", "Pagoda")));
    }

    /// Cache whose next fetch waits for `tx`; later fetches answer `[a, b]` at once
    fn gated_cache() -> (ReferenceCache<Item>, oneshot::Sender<Vec<Item>>) {
        let (tx, rx) = oneshot::channel::<Vec<Item>>();
        let rx = Rc::new(RefCell::new(Some(rx)));
        let cache = ReferenceCache::new("items", move || {
            let rx = rx.borrow_mut().take();
            async move {
                match rx {
                    Some(rx) => rx.await.map_err(|_| ApiError::Network("cancelled".into())),
                    None => Ok(vec![item("a", "Pagoda"), item("b", "Market")]),
                }
            }
        });
        (cache, tx)
    }

    fn spawn_reload(pool: &LocalPool, cache: &ReferenceCache<Item>) {
        let cache = cache.clone();
        pool.spawner()
            .spawn_local(async move {
                let _ = cache.reload().await;
            })
            .unwrap();
    }

    #[test]
    fn test_fetch_landing_during_optimistic_remove_keeps_row_hidden() {
        let (cache, tx) = gated_cache();
        cache.add_many(vec![item("a", "Pagoda"), item("b", "Market")]);

        let mut pool = LocalPool::new();
        spawn_reload(&pool, &cache);
        pool.run_until_stalled();
        assert!(cache.is_loading());

        let ticket = cache.begin_remove("a").unwrap();
        tx.send(vec![item("a", "Pagoda"), item("b", "Market")]).unwrap();
        pool.run_until_stalled();

        assert!(!cache.is_loading());
        assert_eq!(cache.get("a"), None);
        cache.confirm(ticket, None);
        assert_eq!(cache.items(), vec![item("b", "Market")]);
    }

    #[test]
    fn test_fetch_landing_during_optimistic_remove_can_still_roll_back() {
        let (cache, tx) = gated_cache();
        cache.add(item("a", "Pagoda"));

        let mut pool = LocalPool::new();
        spawn_reload(&pool, &cache);
        pool.run_until_stalled();

        let ticket = cache.begin_remove("a").unwrap();
        tx.send(vec![item("a", "Shwe Pagoda")]).unwrap();
        pool.run_until_stalled();
        assert_eq!(cache.len(), 0);

        cache.rollback(ticket);
        assert_eq!(cache.items(), vec![item("a", "Shwe Pagoda")]);
    }

    #[test]
    fn test_fetch_landing_keeps_pending_update_and_create() {
        let (cache, tx) = gated_cache();
        cache.add_many(vec![item("a", "Pagoda"), item("b", "Market")]);

        let mut pool = LocalPool::new();
        spawn_reload(&pool, &cache);
        pool.run_until_stalled();

        let update = cache.begin_update("b", item("b", "Night Market")).unwrap();
        let create = cache.begin_create(item("tmp-1", "Bridge"));
        tx.send(vec![item("a", "Pagoda"), item("b", "Market")]).unwrap();
        pool.run_until_stalled();

        assert_eq!(cache.get("b"), Some(item("b", "Night Market")));
        assert!(cache.snapshot().is_pending("b"));
        assert_eq!(cache.get("tmp-1"), Some(item("tmp-1", "Bridge")));
        assert_eq!(cache.len(), 3);

        cache.confirm(create, Some(item("7", "Bridge")));
        cache.rollback(update);
        assert_eq!(
            cache.items(),
            vec![item("a", "Pagoda"), item("b", "Market"), item("7", "Bridge")]
        );
    }

    #[test]
    fn test_optimistic_update_and_create() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        block_on(cache.fetch()).unwrap();

        let ticket = cache.begin_update("2", item("2", "Night Market")).unwrap();
        assert!(cache.snapshot().is_pending("2"));
        cache.rollback(ticket);
        assert_eq!(cache.get("2"), Some(item("2", "Market")));
        assert!(!cache.snapshot().is_pending("2"));

        let ticket = cache.begin_update("2", item("2", "Night Market")).unwrap();
        cache.confirm(ticket, Some(item("2", "Night Market (server)")));
        assert_eq!(cache.get("2"), Some(item("2", "Night Market (server)")));

        let ticket = cache.begin_create(item("tmp-1", "Bridge"));
        assert_eq!(cache.len(), 3);
        block_on(cache.apply_optimistic(ticket, async { Ok(Some(item("7", "Bridge"))) })).unwrap();
        assert_eq!(cache.get("tmp-1"), None);
        assert_eq!(cache.get("7"), Some(item("7", "Bridge")));
        assert_eq!(cache.len(), 3);

        let ticket = cache.begin_create(item("tmp-2", "Ferry"));
        cache.rollback(ticket);
        assert_eq!(cache.get("tmp-2"), None);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_persistence_restores_within_ttl() {
        let storage = MemoryStorage::new();
        let clock = ManualClock::new();
        let calls = Rc::new(Cell::new(0));

        let target = PersistTarget::new(Rc::new(storage.clone()), "items-store", 1);
        let cache = counting_cache(Rc::clone(&calls), &clock).with_persistence(target.clone());
        block_on(cache.fetch()).unwrap();
        let ticket = cache.begin_create(item("tmp", "Unsaved"));
        cache.add(item("3", "School"));
        assert!(storage.get_item("items-store").is_some());

        let restored = counting_cache(Rc::clone(&calls), &clock).with_persistence(target);
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.get("tmp"), None);
        assert_eq!(restored.get("3"), Some(item("3", "School")));

        clock.advance(Duration::minutes(10));
        block_on(restored.fetch()).unwrap();
        assert_eq!(calls.get(), 1);
        cache.rollback(ticket);
    }

    #[test]
    fn test_listeners_see_changes() {
        let clock = ManualClock::new();
        let cache = counting_cache(Rc::new(Cell::new(0)), &clock);
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let observed = cache.clone();
        cache.subscribe(move || {
            // listeners may read the cache
            let _ = observed.len();
            counter.set(counter.get() + 1);
        });

        block_on(cache.fetch()).unwrap();
        cache.add(item("9", "Dock"));
        assert!(seen.get() >= 3);
    }
}
