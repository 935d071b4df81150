use contracts::domain::a005_road::aggregate::ROAD_TYPES;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use super::view_model::RoadDetailsViewModel;
use crate::domain::a004_location::store::use_location_store;
use crate::domain::a005_road::store::use_road_store;
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_lat_lon;

const LIST_PATH: &str = "/admin/roads";

#[component]
pub fn RoadDetails() -> impl IntoView {
    let roads = use_road_store();
    let locations = use_location_store();
    let ctx = use_global_context();
    let navigate = use_navigate();
    let vm = RoadDetailsViewModel::new();
    let (selected_location, set_selected_location) = signal(String::new());

    locations.fetch();

    let add_selected = move |_| {
        let id = selected_location.get_untracked();
        if let Some(location) = locations.get(&id) {
            vm.error.set(None);
            vm.add_point(&location);
            set_selected_location.set(String::new());
        }
    };

    let nav_back = navigate.clone();
    let on_save = move |_| {
        let navigate = navigate.clone();
        let client = ctx.api();
        spawn_local(async move {
            if vm.save(client, roads).await.success {
                navigate(LIST_PATH, Default::default());
            }
        });
    };

    let field_error = move |field: &'static str| {
        move || vm.field_error(field).map(|e| view! { <span class="form-group__error">{e}</span> })
    };

    view! {
        <div class="details-container road-details">
            <div class="details-header">
                <h3>{"New road"}</h3>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <div class="details-form">
                <div class="form-group">
                    <label for="english_name">{"English name"}</label>
                    <input
                        type="text"
                        id="english_name"
                        prop:value=move || vm.form.with(|f| f.english_name.clone())
                        on:input=move |ev| vm.form.update(|f| f.english_name = event_target_value(&ev))
                    />
                    {field_error("english_name")}
                </div>
                <div class="form-group">
                    <label for="burmese_name">{"Burmese name"}</label>
                    <input
                        type="text"
                        id="burmese_name"
                        prop:value=move || vm.form.with(|f| f.burmese_name.clone())
                        on:input=move |ev| vm.form.update(|f| f.burmese_name = event_target_value(&ev))
                    />
                    {field_error("burmese_name")}
                </div>
                <div class="form-group">
                    <label for="road_type">{"Road type"}</label>
                    <select
                        id="road_type"
                        prop:value=move || vm.form.with(|f| f.road_type.clone())
                        on:change=move |ev| vm.form.update(|f| f.road_type = event_target_value(&ev))
                    >
                        {ROAD_TYPES.iter().map(|t| view! { <option value=*t>{*t}</option> }).collect_view()}
                    </select>
                    {field_error("road_type")}
                </div>
                <div class="form-group form-group--inline">
                    <input
                        type="checkbox"
                        id="is_oneway"
                        prop:checked=move || vm.form.with(|f| f.is_oneway)
                        on:change=move |ev| vm.form.update(|f| f.is_oneway = event_target_checked(&ev))
                    />
                    <label for="is_oneway">{"One-way"}</label>
                </div>
                <div class="form-group">
                    <label for="length_m">{"Length (meters)"}</label>
                    <input
                        type="text"
                        id="length_m"
                        placeholder="Measured from the points when empty"
                        prop:value=move || vm.form.with(|f| f.length.clone())
                        on:input=move |ev| vm.form.update(|f| f.length = event_target_value(&ev))
                    />
                    {field_error("length_m")}
                </div>

                <div class="form-group">
                    <label for="point">{"Points"}</label>
                    <div class="form-group__row">
                        <select
                            id="point"
                            prop:value=move || selected_location.get()
                            on:change=move |ev| set_selected_location.set(event_target_value(&ev))
                        >
                            <option value="">{"Select a location"}</option>
                            {move || locations.items().into_iter().map(|l| {
                                let used = vm.form.with(|f| f.points.iter().any(|p| p.location_id == l.id));
                                view! { <option value=l.id.clone() disabled=used>{l.english_name.clone()}</option> }
                            }).collect_view()}
                        </select>
                        <button
                            class="button button--secondary"
                            disabled=move || selected_location.get().is_empty()
                            on:click=add_selected
                        >
                            {"Add"}
                        </button>
                    </div>
                    {field_error("coordinates")}
                    <ol class="road-points">
                        {move || vm.form.with(|f| f.points.clone()).into_iter().enumerate().map(|(index, point)| {
                            view! {
                                <li class="road-points__item">
                                    <span>{point.name}</span>
                                    <span class="road-points__coords">
                                        {format_lat_lon(point.position[1], point.position[0])}
                                    </span>
                                    <button
                                        class="button button--secondary"
                                        on:click=move |_| vm.form.update(|f| f.remove_point(index))
                                    >
                                        "✕"
                                    </button>
                                </li>
                            }
                        }).collect_view()}
                    </ol>
                </div>
            </div>

            <div class="details-actions">
                <button class="button button--primary" disabled=move || vm.saving.get() on:click=on_save>
                    {"Create"}
                </button>
                <button class="button button--secondary" on:click=move |_| nav_back(LIST_PATH, Default::default())>
                    {"Cancel"}
                </button>
            </div>
        </div>
    }
}
