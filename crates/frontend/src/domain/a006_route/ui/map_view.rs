use contracts::domain::a006_route::aggregate::RouteResult;
use leptos::html::Div;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::route_form::RouteForm;
use super::route_panel::RoutePanel;
use crate::domain::a004_location::store::use_location_store;
use crate::domain::a006_route::api::fetch_route_history;
use crate::domain::a006_route::drawer::RouteDrawer;
use crate::domain::a006_route::mapbox::{BrowserFrames, MapboxSurface};
use crate::layout::global_context::use_global_context;

type MapDrawer = RouteDrawer<MapboxSurface, BrowserFrames>;

/// Navigator map page. With `route_id` the stored route is loaded and drawn
/// as soon as the map is ready.
#[component]
pub fn MapView(#[prop(optional, into)] route_id: Option<String>) -> impl IntoView {
    let ctx = use_global_context();
    let locations = use_location_store();
    let container = NodeRef::<Div>::new();

    let drawer = StoredValue::new_local(None::<MapDrawer>);
    let map_ready = RwSignal::new(false);
    let map_error = RwSignal::new(None::<String>);
    let current_route = RwSignal::new(None::<RouteResult>);
    let routing = RwSignal::new(false);
    let history_requested = StoredValue::new(false);
    let route_id = StoredValue::new(route_id);

    locations.fetch();

    Effect::new(move |_| {
        let Some(div) = container.get() else {
            return;
        };
        if drawer.with_value(Option::is_some) {
            return;
        }
        let config = ctx.config();
        let created = MapboxSurface::create(
            &div,
            &config.map,
            move || map_ready.set(true),
            move |message| map_error.set(Some(message)),
        );
        match created {
            Ok(surface) => {
                let steps = config.animation.steps;
                drawer.set_value(Some(RouteDrawer::new(surface, BrowserFrames, steps)));
            }
            Err(message) => {
                log::error!("{}", message);
                map_error.set(Some(message));
            }
        }
    });

    on_cleanup(move || {
        drawer.update_value(|d| {
            if let Some(d) = d.take() {
                d.clear();
                d.surface().destroy();
            }
        });
    });

    Effect::new(move |_| {
        if !map_ready.get() {
            return;
        }
        let items = locations.items();
        drawer.with_value(|d| {
            if let Some(d) = d {
                d.surface().show_locations(&items);
            }
        });
    });

    let draw = move |route: RouteResult| {
        let result = drawer.with_value(|d| match d {
            Some(d) => {
                routing.set(true);
                Some(d.draw(&route, move || routing.set(false)))
            }
            None => None,
        });
        match result {
            Some(Ok(())) => {
                map_error.set(None);
                current_route.set(Some(route));
            }
            Some(Err(e)) => {
                routing.set(false);
                map_error.set(Some(e.to_string()));
            }
            None => map_error.set(Some("Map is not ready yet".to_string())),
        }
    };

    let clear = move || {
        drawer.with_value(|d| {
            if let Some(d) = d {
                d.clear();
            }
        });
        routing.set(false);
        current_route.set(None);
    };

    Effect::new(move |_| {
        if !map_ready.get() || history_requested.get_value() {
            return;
        }
        let Some(id) = route_id.get_value() else {
            return;
        };
        history_requested.set_value(true);
        let client = ctx.api();
        spawn_local(async move {
            match fetch_route_history(&client, &id).await {
                Ok(route) => draw(route),
                Err(e) => {
                    log::warn!("route {} could not be loaded: {}", id, e);
                    map_error.set(Some(e.to_string()));
                }
            }
        });
    });

    view! {
        <div class="map-page">
            <div class="map-page__canvas" node_ref=container></div>

            {move || map_error.get().map(|e| view! {
                <div class="map-page__error warning-box">
                    <span class="warning-box__icon">"⚠️"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <div class="map-page__controls">
                <RouteForm
                    on_route=Callback::new(draw)
                    on_clear=Callback::new(move |_| clear())
                    busy=routing
                />
                <button
                    class="button button--secondary"
                    disabled=move || locations.is_loading()
                    on:click=move |_| locations.reload()
                >
                    {move || if locations.is_loading() { "🔄 Loading..." } else { "🔄 Refresh Nodes" }}
                </button>
                <Show when=move || !locations.items().is_empty()>
                    <div class="map-page__badge">
                        {move || format!("📍 {} locations loaded", locations.items().len())}
                    </div>
                </Show>
            </div>

            <RoutePanel route=current_route />
        </div>
    }
}
