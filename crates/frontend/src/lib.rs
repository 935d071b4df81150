pub mod app;
pub mod domain;
pub mod layout;
pub mod routes;
pub mod shared;
pub mod system;

use wasm_bindgen::prelude::wasm_bindgen;

use app::{AppKind, NavigatorApp, StorefrontApp};
use leptos::prelude::*;
use shared::config::load_config;

fn body_app_attribute() -> Option<String> {
    web_sys::window()?
        .document()?
        .body()?
        .get_attribute("data-app")
}

pub fn hydrate() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    let kind = AppKind::from_attribute(body_app_attribute().as_deref());
    log::info!("starting {:?}", kind);

    wasm_bindgen_futures::spawn_local(async move {
        let config = load_config().await;
        match kind {
            AppKind::Storefront => {
                leptos::mount::mount_to_body(move || view! { <StorefrontApp config=config /> })
            }
            AppKind::Navigator => {
                leptos::mount::mount_to_body(move || view! { <NavigatorApp config=config /> })
            }
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
