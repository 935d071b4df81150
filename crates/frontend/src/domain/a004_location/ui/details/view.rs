use contracts::domain::a004_location::aggregate::LOCATION_TYPES;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use super::view_model::{LocationDetailsViewModel, LocationForm};
use crate::domain::a004_location::store::use_location_store;
use crate::layout::global_context::use_global_context;

const LIST_PATH: &str = "/admin/locations";

#[component]
pub fn LocationDetails(#[prop(optional)] id: Option<String>) -> impl IntoView {
    let store = use_location_store();
    let ctx = use_global_context();
    let navigate = use_navigate();
    let vm = LocationDetailsViewModel::new(id);

    if vm.is_edit_mode() {
        store.fetch();
        Effect::new(move |_| {
            store.snapshot().track();
            vm.sync_from_store(store);
        });
    }

    let text_field = move |field: &'static str,
                           label: &'static str,
                           get: fn(&LocationForm) -> String,
                           set: fn(&mut LocationForm, String)| {
        view! {
            <div class="form-group">
                <label for=field>{label}</label>
                <input
                    type="text"
                    id=field
                    prop:value=move || vm.form.with(get)
                    on:input=move |ev| vm.form.update(|f| set(f, event_target_value(&ev)))
                />
                {move || vm.field_error(field).map(|e| view! { <span class="form-group__error">{e}</span> })}
            </div>
        }
    };

    let nav_back = navigate.clone();
    let on_save = move |_| {
        let navigate = navigate.clone();
        let client = ctx.api();
        spawn_local(async move {
            let result = vm.save(client, store).await;
            if result.success {
                navigate(LIST_PATH, Default::default());
            }
        });
    };

    view! {
        <div class="details-container location-details">
            <div class="details-header">
                <h3>{move || if vm.is_edit_mode() { "Edit location" } else { "New location" }}</h3>
            </div>

            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <Show
                when=move || vm.is_loaded()
                fallback=move || view! {
                    <div class="loading">
                        {move || if store.is_loading() { "Loading location..." } else { "Location not found" }}
                    </div>
                }
            >
                <div class="details-form">
                    {text_field("english_name", "English name", |f| f.english_name.clone(), |f, v| f.english_name = v)}
                    {text_field("burmese_name", "Burmese name", |f| f.burmese_name.clone(), |f, v| f.burmese_name = v)}
                    {text_field("address", "Address", |f| f.address.clone(), |f, v| f.address = v)}
                    {text_field("description", "Description", |f| f.description.clone(), |f, v| f.description = v)}
                    <div class="form-group">
                        <label for="type">{"Type"}</label>
                        <select
                            id="type"
                            prop:value=move || vm.form.with(|f| f.location_type.clone())
                            on:change=move |ev| vm.form.update(|f| f.location_type = event_target_value(&ev))
                        >
                            {LOCATION_TYPES
                                .iter()
                                .map(|t| view! { <option value=*t>{t.replace('_', " ")}</option> })
                                .collect_view()}
                        </select>
                        {move || vm.field_error("type").map(|e| view! { <span class="form-group__error">{e}</span> })}
                    </div>
                    {text_field("lat", "Latitude", |f| f.lat.clone(), |f, v| f.lat = v)}
                    {text_field("lon", "Longitude", |f| f.lon.clone(), |f, v| f.lon = v)}
                </div>
            </Show>

            <div class="details-actions">
                <button
                    class="button button--primary"
                    disabled=move || vm.saving.get() || !vm.is_loaded()
                    on:click=on_save
                >
                    {move || if vm.is_edit_mode() { "Save" } else { "Create" }}
                </button>
                <button class="button button--secondary" on:click=move |_| nav_back(LIST_PATH, Default::default())>
                    {"Cancel"}
                </button>
            </div>
        </div>
    }
}
