use contracts::domain::a004_location::aggregate::Location;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::domain::a004_location::api::delete_location;
use crate::domain::a004_location::store::use_location_store;
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_lat_lon;
use crate::shared::list_utils::{
    clamp_page, filter_list, get_sort_indicator, highlight_matches, page_count, paginate,
    sort_list, toggle_sort, SearchInput, PAGE_SIZE,
};

/// Filtered, sorted rows of the current page plus the total row count
pub fn visible_rows(
    items: Vec<Location>,
    filter: &str,
    sort_field: &str,
    ascending: bool,
    page: usize,
) -> (Vec<Location>, usize) {
    let mut rows = filter_list(items, filter);
    sort_list(&mut rows, sort_field, ascending);
    let total = rows.len();
    (paginate(&rows, page, PAGE_SIZE), total)
}

#[component]
#[allow(non_snake_case)]
pub fn LocationList() -> impl IntoView {
    let store = use_location_store();
    let ctx = use_global_context();
    let navigate = use_navigate();

    let (filter, set_filter) = signal(String::new());
    let (sort_field, set_sort_field) = signal("english_name".to_string());
    let (sort_ascending, set_sort_ascending) = signal(true);
    let (page, set_page) = signal(0usize);
    let (action_error, set_action_error) = signal::<Option<String>>(None);

    store.fetch();

    let rows = Memo::new(move |_| {
        visible_rows(
            store.items(),
            &filter.get(),
            &sort_field.get(),
            sort_ascending.get(),
            page.get(),
        )
    });
    let total_pages = move || page_count(rows.with(|(_, total)| *total), PAGE_SIZE);
    let current_page = move || clamp_page(page.get(), rows.with(|(_, total)| *total), PAGE_SIZE);

    let sort_by = move |field: &'static str| {
        let (field, ascending) = toggle_sort(&sort_field.get_untracked(), sort_ascending.get_untracked(), field);
        set_sort_field.set(field);
        set_sort_ascending.set(ascending);
    };

    let header = move |field: &'static str, title: &'static str| {
        view! {
            <th class="table__header-cell table__header-cell--sortable" on:click=move |_| sort_by(field)>
                {title}
                <span class="table__sort-indicator">
                    {move || get_sort_indicator(&sort_field.get(), field, sort_ascending.get())}
                </span>
            </th>
        }
    };

    let handle_delete = move |id: String| {
        let confirmed = web_sys::window()
            .and_then(|win| win.confirm_with_message("Delete this location?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        set_action_error.set(None);
        let client = ctx.api();
        spawn_local(async move {
            let request_id = id.clone();
            let request = async move { delete_location(&client, &request_id).await };
            if let Err(e) = store.remove_optimistic(&id, request).await {
                log::warn!("location {} was not deleted: {}", id, e);
                set_action_error.set(Some(format!("Failed to delete location: {}", e)));
            }
        });
    };

    let nav_create = navigate.clone();
    let nav_edit = navigate;

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Locations"}</h1>
                </div>
                <div class="header__actions">
                    <SearchInput
                        value=filter
                        on_change=Callback::new(move |value: String| {
                            set_filter.set(value);
                            set_page.set(0);
                        })
                        placeholder="Search locations..."
                    />
                    <button class="button button--primary" on:click=move |_| nav_create("/admin/locations/create", Default::default())>
                        {"New location"}
                    </button>
                    <button class="button button--secondary" on:click=move |_| store.reload()>
                        {"Reload"}
                    </button>
                </div>
            </div>

            {move || store.error().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                    <button class="button button--secondary" on:click=move |_| store.reload()>{"Retry"}</button>
                    <button class="button button--secondary" on:click=move |_| store.clear_error()>{"Dismiss"}</button>
                </div>
            })}
            {move || action_error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                </div>
            })}

            <Show when=move || store.is_loading()>
                <div class="loading">{"Loading locations..."}</div>
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {header("english_name", "English name")}
                            {header("burmese_name", "Burmese name")}
                            {header("address", "Address")}
                            {header("type", "Type")}
                            {header("lat", "Lat / Lon")}
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {
                            let nav_edit = nav_edit.clone();
                            move || {
                                let needle = filter.get();
                                let pending = store.snapshot();
                                rows.get().0.into_iter().map(|row| {
                                    let id = row.id.clone();
                                    let id_for_edit = id.clone();
                                    let id_for_delete = id.clone();
                                    let is_pending = pending.with(|s| s.is_pending(&id));
                                    let nav_edit = nav_edit.clone();
                                    view! {
                                        <tr class="table__row" class:table__row--pending=is_pending>
                                            <td class="table__cell">{highlight_matches(&row.english_name, &needle)}</td>
                                            <td class="table__cell">{highlight_matches(&row.burmese_name, &needle)}</td>
                                            <td class="table__cell">{highlight_matches(&row.address, &needle)}</td>
                                            <td class="table__cell">{highlight_matches(&row.location_type, &needle)}</td>
                                            <td class="table__cell">{format_lat_lon(row.lat, row.lon)}</td>
                                            <td class="table__cell table__cell--actions">
                                                <button
                                                    class="button button--secondary"
                                                    on:click=move |_| nav_edit(&format!("/admin/locations/update/{}", id_for_edit), Default::default())
                                                >
                                                    {"Edit"}
                                                </button>
                                                <button
                                                    class="button button--secondary"
                                                    disabled=is_pending
                                                    on:click=move |_| handle_delete(id_for_delete.clone())
                                                >
                                                    {"Delete"}
                                                </button>
                                            </td>
                                        </tr>
                                    }
                                }).collect_view()
                            }
                        }
                    </tbody>
                </table>
            </div>

            <div class="pagination">
                <button
                    class="button button--secondary"
                    disabled=move || current_page() == 0
                    on:click=move |_| set_page.set(current_page().saturating_sub(1))
                >
                    {"Previous"}
                </button>
                <span class="pagination__info">
                    {move || format!("Page {} of {}", current_page() + 1, total_pages())}
                </span>
                <button
                    class="button button--secondary"
                    disabled=move || current_page() + 1 >= total_pages()
                    on:click=move |_| set_page.set(current_page() + 1)
                >
                    {"Next"}
                </button>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(id: usize) -> Location {
        Location {
            id: id.to_string(),
            english_name: format!("Place {:02}", id),
            burmese_name: String::new(),
            address: if id % 2 == 0 { "Pagoda Road".into() } else { "Strand Road".into() },
            description: None,
            lat: 16.7,
            lon: 95.6,
            location_type: "landmark".into(),
        }
    }

    #[test]
    fn test_visible_rows_pages_filtered_list() {
        let items: Vec<Location> = (1..=25).map(location).collect();

        let (rows, total) = visible_rows(items.clone(), "", "english_name", true, 2);
        assert_eq!(total, 25);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].english_name, "Place 21");

        let (rows, total) = visible_rows(items.clone(), "pagoda", "english_name", false, 0);
        assert_eq!(total, 12);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].english_name, "Place 24");

        // page index past the end is clamped to the last page
        let (rows, _) = visible_rows(items, "pagoda", "english_name", false, 9);
        assert_eq!(rows.len(), 2);
    }
}
