use gloo_net::http::Request;
use serde::Deserialize;

use contracts::shared::LngLat;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub map: MapConfig,
    pub cache: CacheConfig,
    pub animation: AnimationConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Empty means "same host, port 3000"
    pub storefront_base_url: String,
    pub navigator_base_url: String,
    /// Prefix for product/post image paths; empty means the storefront base
    #[serde(default)]
    pub image_base_url: String,
}

impl ApiConfig {
    pub fn image_url(&self, path: &str) -> String {
        let base = if self.image_base_url.is_empty() {
            &self.storefront_base_url
        } else {
            &self.image_base_url
        };
        if base.is_empty() {
            return format!("/{}", path.trim_start_matches('/'));
        }
        super::api_utils::join_url(base, path)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MapConfig {
    pub access_token: String,
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
    /// `[south_west, north_east]`
    pub max_bounds: [LngLat; 2],
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheConfig {
    pub reference_ttl_minutes: i64,
    pub query_stale_minutes: i64,
    pub posts_page_size: u32,
    pub products_page_size: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnimationConfig {
    pub steps: u32,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
storefront_base_url = ""
navigator_base_url = "https://maubin-routing.onrender.com"
image_base_url = ""

[map]
access_token = ""
style = "mapbox://styles/mapbox/standard"
center = [95.6483, 16.7341]
zoom = 13.0
max_bounds = [[95.6244, 16.7215], [95.6644, 16.7415]]

[cache]
reference_ttl_minutes = 30
query_stale_minutes = 5
posts_page_size = 6
products_page_size = 8

[animation]
steps = 100
"#;

/// Path the static host may serve an override from
const CONFIG_OVERRIDE_PATH: &str = "/config.toml";

impl Default for AppConfig {
    fn default() -> Self {
        // The embedded document is covered by tests
        parse_config(DEFAULT_CONFIG).unwrap_or_else(|e| panic!("embedded config is invalid: {}", e))
    }
}

pub fn parse_config(contents: &str) -> Result<AppConfig, String> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| e.to_string())?;
    if config.animation.steps == 0 {
        return Err("animation.steps must be positive".to_string());
    }
    if config.cache.posts_page_size == 0 || config.cache.products_page_size == 0 {
        return Err("page sizes must be positive".to_string());
    }
    Ok(config)
}

/// Load configuration
///
/// Search order:
/// 1. `/config.toml` served next to the bundle
/// 2. Falls back to embedded default config
pub async fn load_config() -> AppConfig {
    match Request::get(CONFIG_OVERRIDE_PATH).send().await {
        Ok(response) if response.ok() => match response.text().await {
            Ok(text) => match parse_config(&text) {
                Ok(config) => {
                    log::info!("Loaded config from {}", CONFIG_OVERRIDE_PATH);
                    return config;
                }
                Err(e) => log::warn!("Ignoring {}: {}", CONFIG_OVERRIDE_PATH, e),
            },
            Err(e) => log::warn!("Failed to read {}: {}", CONFIG_OVERRIDE_PATH, e),
        },
        Ok(response) => log::debug!("{} not served ({})", CONFIG_OVERRIDE_PATH, response.status()),
        Err(e) => log::debug!("{} not available: {}", CONFIG_OVERRIDE_PATH, e),
    }

    log::info!("Using default embedded configuration");
    AppConfig::default()
}
