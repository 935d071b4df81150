use chrono::Duration;
use leptos::prelude::*;

use crate::domain::a001_cart::store::provide_cart_store;
use crate::domain::a002_product::filter_store::provide_filter_store;
use crate::domain::a004_location::store::provide_location_store;
use crate::domain::a005_road::store::provide_road_store;
use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::{NavigatorRoutes, StorefrontRoutes};
use crate::shared::config::AppConfig;
use crate::system::auth::context::AuthProvider;

/// Which client `start()` mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKind {
    Storefront,
    Navigator,
}

impl AppKind {
    /// From `<body data-app="..">`; anything but `navigator` is the storefront
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("navigator") => AppKind::Navigator,
            _ => AppKind::Storefront,
        }
    }
}

#[component]
pub fn StorefrontApp(config: AppConfig) -> impl IntoView {
    let api_base = config.api.storefront_base_url.clone();
    let ctx = AppGlobalContext::new(config, &api_base);
    ctx.left_open.set(false);
    provide_context(ctx);

    provide_cart_store();
    provide_filter_store();

    view! {
        <AuthProvider>
            <StorefrontRoutes />
        </AuthProvider>
    }
}

#[component]
pub fn NavigatorApp(config: AppConfig) -> impl IntoView {
    let api_base = config.api.navigator_base_url.clone();
    let ttl = Duration::minutes(config.cache.reference_ttl_minutes);
    let ctx = AppGlobalContext::new(config, &api_base);
    provide_context(ctx);

    provide_location_store(ctx.api(), ttl);
    provide_road_store(ctx.api(), ttl);

    view! {
        <AuthProvider>
            <NavigatorRoutes />
        </AuthProvider>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_kind_from_attribute() {
        assert_eq!(AppKind::from_attribute(Some("navigator")), AppKind::Navigator);
        assert_eq!(AppKind::from_attribute(Some(" Navigator ")), AppKind::Navigator);
        assert_eq!(AppKind::from_attribute(Some("shop")), AppKind::Storefront);
        assert_eq!(AppKind::from_attribute(None), AppKind::Storefront);
    }
}
