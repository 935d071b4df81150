use leptos::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::storage::{PersistTarget, FILTER_STORAGE_KEY};

pub const PRODUCTS_PATH: &str = "/products";

/// Category/type selection as comma-joined id lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub categories: String,
    #[serde(default)]
    pub types: String,
}

/// Numeric ids in `csv`, in order; anything that is not an integer is dropped
pub fn parse_ids(csv: &str) -> Vec<i64> {
    csv.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<i64>().ok())
        .collect()
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl FilterState {
    pub fn add_categories(&mut self, categories: &str) {
        self.categories = categories.to_string();
    }

    pub fn add_types(&mut self, types: &str) {
        self.types = types.to_string();
    }

    pub fn clear_filter(&mut self) {
        self.categories.clear();
        self.types.clear();
    }

    pub fn category_ids(&self) -> Vec<i64> {
        parse_ids(&self.categories)
    }

    pub fn type_ids(&self) -> Vec<i64> {
        parse_ids(&self.types)
    }

    /// Canonical ids, `None` when the list is empty
    pub fn category_param(&self) -> Option<String> {
        Some(join_ids(&self.category_ids())).filter(|s| !s.is_empty())
    }

    pub fn type_param(&self) -> Option<String> {
        Some(join_ids(&self.type_ids())).filter(|s| !s.is_empty())
    }

    /// `categories=..&types=..` with empty lists left out
    pub fn query_string(&self) -> String {
        let mut params = Vec::with_capacity(2);
        if let Some(categories) = self.category_param() {
            params.push(format!("categories={}", categories));
        }
        if let Some(types) = self.type_param() {
            params.push(format!("types={}", types));
        }
        params.join("&")
    }

    pub fn filter_link(&self) -> String {
        format!("{}?{}", PRODUCTS_PATH, self.query_string())
    }

    /// Selection carried by a `/products?categories=..&types=..` query
    pub fn from_query(categories: Option<&str>, types: Option<&str>) -> Self {
        Self {
            categories: categories.unwrap_or_default().to_string(),
            types: types.unwrap_or_default().to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_ids().is_empty() && self.type_ids().is_empty()
    }
}

/// Reactive filter selection shared through context; persisted to session storage
#[derive(Clone, Copy)]
pub struct FilterStore {
    state: RwSignal<FilterState>,
    persist: StoredValue<PersistTarget, LocalStorage>,
}

impl FilterStore {
    pub fn new(persist: PersistTarget) -> Self {
        let initial = persist.load::<FilterState>().unwrap_or_default();
        Self {
            state: RwSignal::new(initial),
            persist: StoredValue::new_local(persist),
        }
    }

    pub fn from_session() -> Self {
        Self::new(PersistTarget::session(FILTER_STORAGE_KEY))
    }

    fn mutate(&self, f: impl FnOnce(&mut FilterState)) {
        self.state.update(f);
        self.state
            .with_untracked(|state| self.persist.with_value(|p| p.save(state)));
    }

    pub fn add_categories(&self, categories: &str) {
        self.mutate(|s| s.add_categories(categories));
    }

    pub fn add_types(&self, types: &str) {
        self.mutate(|s| s.add_types(types));
    }

    pub fn clear_filter(&self) {
        self.mutate(FilterState::clear_filter);
    }

    pub fn state(&self) -> FilterState {
        self.state.get()
    }

    pub fn filter_link(&self) -> String {
        self.state.with(FilterState::filter_link)
    }
}

pub fn provide_filter_store() -> FilterStore {
    let store = FilterStore::from_session();
    provide_context(store);
    store
}

pub fn use_filter_store() -> FilterStore {
    use_context::<FilterStore>().expect("FilterStore not provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(categories: &str, types: &str) -> FilterState {
        let mut state = FilterState::default();
        state.add_categories(categories);
        state.add_types(types);
        state
    }

    #[test]
    fn test_filter_link_param_combinations() {
        assert_eq!(filter("1,2", "3").filter_link(), "/products?categories=1,2&types=3");
        assert_eq!(filter("", "2,3").filter_link(), "/products?types=2,3");
        assert_eq!(filter("4", "").filter_link(), "/products?categories=4");
        assert_eq!(filter("", "").filter_link(), "/products?");
    }

    #[test]
    fn test_non_numeric_ids_dropped() {
        assert_eq!(parse_ids("1,abc,3"), vec![1, 3]);
        assert_eq!(parse_ids(" 4 , ,05"), vec![4, 5]);
        assert_eq!(filter("x,y", "").filter_link(), "/products?");
        assert!(filter("x", ",").is_empty());
    }

    #[test]
    fn test_duplicates_are_not_removed() {
        assert_eq!(filter("2,2", "").filter_link(), "/products?categories=2,2");
    }

    #[test]
    fn test_clear_filter() {
        let mut state = filter("1", "2");
        state.clear_filter();
        assert_eq!(state, FilterState::default());
        assert_eq!(state.categories, "");
        assert_eq!(state.types, "");
    }

    #[test]
    fn test_params_for_product_query() {
        let state = FilterState::from_query(Some("3,x"), None);
        assert_eq!(state.category_param().as_deref(), Some("3"));
        assert_eq!(state.type_param(), None);
        assert_eq!(state.query_string(), "categories=3");
    }
}
