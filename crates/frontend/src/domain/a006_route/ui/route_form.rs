use contracts::domain::a004_location::aggregate::Location;
use contracts::domain::a006_route::aggregate::{RouteRequest, RouteResult};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::domain::a004_location::store::use_location_store;
use crate::domain::a006_route::api::request_route;
use crate::layout::global_context::use_global_context;

/// Request body for a trip between two known locations
pub fn route_request(
    locations: &[Location],
    start_id: &str,
    end_id: &str,
) -> Result<RouteRequest, String> {
    if start_id.is_empty() || end_id.is_empty() {
        return Err("Choose a start and a destination".to_string());
    }
    if start_id == end_id {
        return Err("Start and destination must differ".to_string());
    }
    let find = |id: &str| locations.iter().find(|l| l.id == id);
    match (find(start_id), find(end_id)) {
        (Some(start), Some(end)) => Ok(RouteRequest::between(start.position(), end.position())),
        _ => Err("Unknown location".to_string()),
    }
}

#[component]
pub fn RouteForm(
    #[prop(into)] on_route: Callback<RouteResult>,
    #[prop(into)] on_clear: Callback<()>,
    #[prop(into)] busy: Signal<bool>,
) -> impl IntoView {
    let locations = use_location_store();
    let ctx = use_global_context();
    let (start, set_start) = signal(String::new());
    let (end, set_end) = signal(String::new());
    let (error, set_error) = signal::<Option<String>>(None);
    let (requesting, set_requesting) = signal(false);

    locations.fetch();

    let submit = move |_| {
        let request = match route_request(&locations.items(), &start.get_untracked(), &end.get_untracked()) {
            Ok(request) => request,
            Err(message) => {
                set_error.set(Some(message));
                return;
            }
        };
        set_error.set(None);
        set_requesting.set(true);
        let client = ctx.api();
        spawn_local(async move {
            match request_route(&client, &request).await {
                Ok(route) => on_route.run(route),
                Err(e) => {
                    log::warn!("route request failed: {}", e);
                    set_error.set(Some(e.to_string()));
                }
            }
            set_requesting.set(false);
        });
    };

    let options = move || {
        locations
            .items()
            .into_iter()
            .map(|l| view! { <option value=l.id.clone()>{l.english_name.clone()}</option> })
            .collect_view()
    };

    view! {
        <div class="route-form">
            <select
                class="route-form__select"
                prop:value=move || start.get()
                on:change=move |ev| set_start.set(event_target_value(&ev))
            >
                <option value="">{"From..."}</option>
                {options}
            </select>
            <select
                class="route-form__select"
                prop:value=move || end.get()
                on:change=move |ev| set_end.set(event_target_value(&ev))
            >
                <option value="">{"To..."}</option>
                {options}
            </select>
            <button
                class="button button--primary"
                disabled=move || requesting.get() || busy.get()
                on:click=submit
            >
                {move || if requesting.get() { "Searching..." } else { "Find route" }}
            </button>
            <button class="button button--secondary" on:click=move |_| on_clear.run(())>
                {move || if busy.get() { "🚶 Routing..." } else { "🗑️ Clear Route" }}
            </button>
            {move || error.get().map(|e| view! { <div class="warning-box__text">{e}</div> })}
        </div>
    }
}
