use chrono::Duration;
use leptos::prelude::*;

use crate::shared::config::AppConfig;
use crate::shared::http::ApiClient;
use crate::shared::query::QueryClient;
use crate::system::auth::storage::stored_token;

/// App-wide services and layout flags, provided once at the root
#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    config: StoredValue<AppConfig>,
    api: StoredValue<ApiClient>,
    queries: StoredValue<QueryClient, LocalStorage>,
    pub left_open: RwSignal<bool>,
    pub cart_open: RwSignal<bool>,
}

impl AppGlobalContext {
    /// `api_base` is the configured base URL of the backend this app talks to
    pub fn new(config: AppConfig, api_base: &str) -> Self {
        let stale = Duration::minutes(config.cache.query_stale_minutes);
        Self {
            api: StoredValue::new(ApiClient::new(api_base).with_token(stored_token)),
            queries: StoredValue::new_local(QueryClient::new(stale)),
            config: StoredValue::new(config),
            left_open: RwSignal::new(true),
            cart_open: RwSignal::new(false),
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn queries(&self) -> QueryClient {
        self.queries.get_value()
    }

    pub fn image_url(&self, path: &str) -> String {
        self.config.with_value(|c| c.api.image_url(path))
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|open| *open = !*open);
    }
}

pub fn use_global_context() -> AppGlobalContext {
    use_context::<AppGlobalContext>().expect("AppGlobalContext context not found")
}
