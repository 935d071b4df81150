use chrono::Duration;
use contracts::domain::a004_location::aggregate::Location;
use leptos::prelude::*;
use std::cmp::Ordering;

use super::api::fetch_locations;
use crate::shared::http::ApiClient;
use crate::shared::list_utils::{contains_ci, Searchable, Sortable};
use crate::shared::reference_cache::{CacheEntity, ReferenceCache};
use crate::shared::reference_store::ReferenceStore;
use crate::shared::storage::{PersistTarget, LOCATION_STORAGE_KEY};

pub const LOCATION_STORE_VERSION: u32 = 1;

impl CacheEntity for Location {
    fn cache_id(&self) -> &str {
        &self.id
    }
}

impl Searchable for Location {
    fn matches_filter(&self, filter: &str) -> bool {
        contains_ci(&self.english_name, filter)
            || contains_ci(&self.burmese_name, filter)
            || contains_ci(&self.address, filter)
            || contains_ci(&self.location_type, filter)
    }
}

impl Sortable for Location {
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "english_name" => self
                .english_name
                .to_lowercase()
                .cmp(&other.english_name.to_lowercase()),
            "burmese_name" => self.burmese_name.cmp(&other.burmese_name),
            "address" => self.address.to_lowercase().cmp(&other.address.to_lowercase()),
            "type" => self.location_type.cmp(&other.location_type),
            "lat" => self.lat.total_cmp(&other.lat),
            "lon" => self.lon.total_cmp(&other.lon),
            _ => Ordering::Equal,
        }
    }
}

/// Location cache backed by `GET /admin/locations`
pub fn location_cache(client: ApiClient, ttl: Duration, persist: PersistTarget) -> ReferenceCache<Location> {
    ReferenceCache::new("locations", move || {
        let client = client.clone();
        async move { fetch_locations(&client).await }
    })
    .with_ttl(ttl)
    .with_persistence(persist)
}

pub fn location_persist_target() -> PersistTarget {
    PersistTarget::local(LOCATION_STORAGE_KEY, LOCATION_STORE_VERSION)
}

pub type LocationStore = ReferenceStore<Location>;

pub fn provide_location_store(client: ApiClient, ttl: Duration) -> LocationStore {
    let store = ReferenceStore::new(location_cache(client, ttl, location_persist_target()));
    provide_context(store);
    store
}

pub fn use_location_store() -> LocationStore {
    use_context::<LocationStore>().expect("LocationStore not provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::list_utils::{filter_list, sort_list};

    fn location(id: &str, name: &str, kind: &str, lat: f64) -> Location {
        Location {
            id: id.to_string(),
            english_name: name.to_string(),
            burmese_name: String::new(),
            address: format!("{} Street", name),
            description: None,
            lat,
            lon: 95.64,
            location_type: kind.to_string(),
        }
    }

    #[test]
    fn test_filter_matches_names_address_and_type() {
        let rows = vec![
            location("1", "Central Market", "market", 16.73),
            location("2", "Township Hospital", "hospital", 16.74),
            location("3", "Pagoda", "temple", 16.72),
        ];
        let hits = filter_list(rows.clone(), "MARKET");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");

        assert_eq!(filter_list(rows.clone(), "temple")[0].id, "3");
        assert_eq!(filter_list(rows.clone(), "street").len(), 3);
        assert_eq!(filter_list(rows, "").len(), 3);
    }

    #[test]
    fn test_sort_by_latitude_and_name() {
        let mut rows = vec![
            location("1", "b", "market", 16.74),
            location("2", "A", "market", 16.72),
            location("3", "c", "market", 16.73),
        ];
        sort_list(&mut rows, "lat", true);
        assert_eq!(rows.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), ["2", "3", "1"]);

        sort_list(&mut rows, "english_name", false);
        assert_eq!(rows.iter().map(|l| l.id.as_str()).collect::<Vec<_>>(), ["3", "1", "2"]);
    }
}
