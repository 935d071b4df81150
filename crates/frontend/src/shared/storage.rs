//! Persistence of client stores in browser storage.
//!
//! Every persisted store is written as `{"state": ..., "version": N}` under its
//! own key. A reader that finds an older version gets a chance to migrate the raw
//! JSON before it is decoded; anything that cannot be decoded is ignored and the
//! store starts from its default.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::window;

pub const CART_STORAGE_KEY: &str = "cart-storage";
pub const FILTER_STORAGE_KEY: &str = "filter-storage";
pub const AUTH_STORAGE_KEY: &str = "auth-storage";
pub const LOCATION_STORAGE_KEY: &str = "location-store";
pub const ROAD_STORAGE_KEY: &str = "road-store";

/// Minimal key/value contract shared by the browser and in-memory backends
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// Survives reloads, cleared with the tab
    Session,
    /// Survives browser restarts
    Local,
}

/// `window.sessionStorage` / `window.localStorage`
#[derive(Debug, Clone, Copy)]
pub struct BrowserStorage {
    kind: StorageKind,
}

impl BrowserStorage {
    pub fn new(kind: StorageKind) -> Self {
        Self { kind }
    }

    pub fn session() -> Self {
        Self::new(StorageKind::Session)
    }

    pub fn local() -> Self {
        Self::new(StorageKind::Local)
    }

    fn raw(&self) -> Option<web_sys::Storage> {
        let window = window()?;
        match self.kind {
            StorageKind::Session => window.session_storage().ok()?,
            StorageKind::Local => window.local_storage().ok()?,
        }
    }
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.raw()?.get_item(key).ok()?
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = self.raw() {
            if storage.set_item(key, value).is_err() {
                log::warn!("storage: failed to write '{}'", key);
            }
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = self.raw() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-memory backend. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    state: &'a T,
    version: u32,
}

#[derive(Deserialize)]
struct EnvelopeIn {
    state: Value,
    #[serde(default)]
    version: u32,
}

/// Hook for stores whose persisted shape changed between versions.
/// Receives the stored version and raw state; returns the upgraded state or
/// `None` to discard it.
pub type Migration = fn(u32, Value) -> Option<Value>;

/// Where and how a store persists itself
#[derive(Clone)]
pub struct PersistTarget {
    storage: Rc<dyn KeyValueStorage>,
    key: &'static str,
    version: u32,
    migrate: Option<Migration>,
}

impl PersistTarget {
    pub fn new(storage: Rc<dyn KeyValueStorage>, key: &'static str, version: u32) -> Self {
        Self {
            storage,
            key,
            version,
            migrate: None,
        }
    }

    pub fn session(key: &'static str) -> Self {
        Self::new(Rc::new(BrowserStorage::session()), key, 0)
    }

    pub fn local(key: &'static str, version: u32) -> Self {
        Self::new(Rc::new(BrowserStorage::local()), key, version)
    }

    pub fn with_migration(mut self, migrate: Migration) -> Self {
        self.migrate = Some(migrate);
        self
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn save<T: Serialize>(&self, state: &T) {
        save_state(self.storage.as_ref(), self.key, self.version, state);
    }

    pub fn load<T: DeserializeOwned>(&self) -> Option<T> {
        load_state(self.storage.as_ref(), self.key, self.version, self.migrate)
    }

    pub fn clear(&self) {
        self.storage.remove_item(self.key);
    }
}

pub fn save_state<T: Serialize>(storage: &dyn KeyValueStorage, key: &str, version: u32, state: &T) {
    match serde_json::to_string(&EnvelopeOut { state, version }) {
        Ok(json) => storage.set_item(key, &json),
        Err(e) => log::error!("storage: failed to serialize '{}': {}", key, e),
    }
}

pub fn load_state<T: DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
    version: u32,
    migrate: Option<Migration>,
) -> Option<T> {
    let raw = storage.get_item(key)?;
    let envelope: EnvelopeIn = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            log::warn!("storage: ignoring unreadable '{}': {}", key, e);
            return None;
        }
    };

    let state = if envelope.version < version {
        match migrate {
            Some(migrate) => migrate(envelope.version, envelope.state)?,
            None => envelope.state,
        }
    } else {
        envelope.state
    };

    match serde_json::from_value(state) {
        Ok(state) => Some(state),
        Err(e) => {
            log::warn!("storage: discarding '{}' (v{}): {}", key, envelope.version, e);
            None
        }
    }
}
