use contracts::domain::a006_route::aggregate::{format_distance, format_duration, RouteResult};
use leptos::prelude::*;

/// Summary card of a drawn route: distance, time, endpoints and roads taken
#[component]
pub fn RoutePanel(#[prop(into)] route: Signal<Option<RouteResult>>) -> impl IntoView {
    move || {
        route.get().map(|route| {
            let roads = route.road_names.clone();
            view! {
                <div class="route-panel">
                    <div class="route-panel__header">
                        <h3 class="route-panel__title">{"Route Information"}</h3>
                        <div class="route-panel__stats">
                            <span class="route-panel__stat">"📏 " {format_distance(route.distance)}</span>
                            <span class="route-panel__stat">"⏱️ " {format_duration(route.estimated_time)}</span>
                        </div>
                    </div>
                    <div class="route-panel__endpoints">
                        <div class="route-panel__endpoint route-panel__endpoint--from">
                            <span class="route-panel__caption">{"FROM"}</span>
                            <div class="route-panel__name">{route.start_location.english_name.clone()}</div>
                            <div class="route-panel__name route-panel__name--my">{route.start_location.burmese_name.clone()}</div>
                        </div>
                        <div class="route-panel__endpoint route-panel__endpoint--to">
                            <span class="route-panel__caption">{"TO"}</span>
                            <div class="route-panel__name">{route.end_location.english_name.clone()}</div>
                            <div class="route-panel__name route-panel__name--my">{route.end_location.burmese_name.clone()}</div>
                        </div>
                    </div>
                    <Show when={
                        let has_roads = !roads.is_empty();
                        move || has_roads
                    }>
                        <div class="route-panel__roads">
                            <div class="route-panel__caption">"🛣️ " {"Route Details"}</div>
                            <ol>
                                {roads.iter().map(|road| view! {
                                    <li class="route-panel__road">
                                        <span>{road.english_name.clone()}</span>
                                        <span class="route-panel__name--my">{road.burmese_name.clone()}</span>
                                        <span class="route-panel__length">{road.length.clone()}</span>
                                    </li>
                                }).collect_view()}
                            </ol>
                        </div>
                    </Show>
                </div>
            }
        })
    }
}
