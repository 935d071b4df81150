use chrono::Duration;
use contracts::domain::a005_road::aggregate::Road;
use leptos::prelude::*;
use serde_json::Value;
use std::cmp::Ordering;

use super::api::fetch_roads;
use crate::shared::http::ApiClient;
use crate::shared::list_utils::{contains_ci, Searchable, Sortable};
use crate::shared::reference_cache::{CacheEntity, ReferenceCache};
use crate::shared::reference_store::ReferenceStore;
use crate::shared::storage::{PersistTarget, ROAD_STORAGE_KEY};

/// v2 added derived `geojson` on every road
pub const ROAD_STORE_VERSION: u32 = 2;

impl CacheEntity for Road {
    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Searchable for Road {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.english_name, filter)
            || contains_ci(&self.burmese_name, filter)
            || contains_ci(&self.road_type, filter)
    }
}

impl Sortable for Road {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "english_name" => self
                .english_name
                .to_lowercase()
                .cmp(&other.english_name.to_lowercase()),
            "burmese_name" => self.burmese_name.cmp(&other.burmese_name),
            "road_type" => self.road_type.cmp(&other.road_type),
            "length" => self.total_length().total_cmp(&other.total_length()),
            "points" => self.coordinates.len().cmp(&other.coordinates.len()),
            "is_oneway" => self.is_oneway.cmp(&other.is_oneway),
            _ => Ordering::Equal,
        }
    }
}

/// Upgrade a persisted road snapshot.
///
/// Before v2 the list was stored as `roads` next to a `roadsById` index and
/// entries could lack `geojson`; both are normalised here. Entries that no
/// longer parse as roads are dropped.
pub fn migrate_road_snapshot(from_version: u32, mut state: Value) -> Option<Value> {
    if from_version >= ROAD_STORE_VERSION {
        return Some(state);
    }
    let fields = state.as_object_mut()?;
    fields.remove("roadsById");
    let legacy = fields.remove("roads");
    if !fields.contains_key("items") {
        fields.insert("items".to_string(), legacy.unwrap_or(Value::Array(Vec::new())));
    }

    let items = match fields.get_mut("items")?.take() {
        Value::Array(items) => items,
        _ => return None,
    };
    let migrated: Vec<Value> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Road>(item).ok())
        .filter_map(|mut road| {
            road.ensure_geojson();
            serde_json::to_value(road).ok()
        })
        .collect();
    fields.insert("items".to_string(), Value::Array(migrated));
    Some(state)
}

pub fn road_cache(client: ApiClient, ttl: Duration, persist: PersistTarget) -> ReferenceCache<Road> {
    ReferenceCache::new("roads", move || {
        let client = client.clone();
        async move { fetch_roads(&client).await }
    })
    .with_ttl(ttl)
    .with_persistence(persist)
}

pub fn road_persist_target() -> PersistTarget {
    PersistTarget::local(ROAD_STORAGE_KEY, ROAD_STORE_VERSION).with_migration(migrate_road_snapshot)
}

pub type RoadStore = ReferenceStore<Road>;

pub fn provide_road_store(client: ApiClient, ttl: Duration) -> RoadStore {
    let store = ReferenceStore::new(road_cache(client, ttl, road_persist_target()));
    provide_context(store);
    store
}

pub fn use_road_store() -> RoadStore {
    use_context::<RoadStore>().expect("RoadStore not provided")
}
