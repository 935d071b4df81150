use contracts::domain::a005_road::aggregate::Road;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;

use crate::domain::a005_road::api::delete_road;
use crate::domain::a005_road::store::use_road_store;
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_number_with_decimals;
use crate::shared::list_utils::{
    clamp_page, filter_list, get_sort_indicator, highlight_matches, page_count, paginate,
    sort_list, toggle_sort, SearchInput, PAGE_SIZE,
};

pub fn visible_rows(
    items: Vec<Road>,
    filter: &str,
    sort_field: &str,
    ascending: bool,
    page: usize,
) -> (Vec<Road>, usize) {
    let mut rows = filter_list(items, filter);
    sort_list(&mut rows, sort_field, ascending);
    let total = rows.len();
    (paginate(&rows, page, PAGE_SIZE), total)
}

#[component]
#[allow(non_snake_case)]
pub fn RoadList() -> impl IntoView {
    let store = use_road_store();
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

    // Row disappears at once and comes back if the server refuses
    let handle_delete = move |id: String| {
        let confirmed = web_sys::window()
            .and_then(|win| win.confirm_with_message("Delete this road?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        set_action_error.set(None);
        let client = ctx.api();
        spawn_local(async move {
            let request_id = id.clone();
            let request = async move { delete_road(&client, &request_id).await };
            if let Err(e) = store.remove_optimistic(&id, request).await {
                log::warn!("road {} was not deleted: {}", id, e);
                set_action_error.set(Some(format!("Failed to delete road: {}", e)));
            }
        });
    };

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Roads"}</h1>
                </div>
                <div class="header__actions">
                    <SearchInput
                        value=filter
                        on_change=Callback::new(move |value: String| {
                            set_filter.set(value);
                            set_page.set(0);
                        })
                        placeholder="Search roads..."
                    />
                    <button class="button button--primary" on:click=move |_| navigate("/admin/roads/create", Default::default())>
                        {"New road"}
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
                <div class="loading">{"Loading roads..."}</div>
            </Show>

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            {header("english_name", "English name")}
                            {header("burmese_name", "Burmese name")}
                            {header("road_type", "Type")}
                            {header("points", "Points")}
                            {header("length", "Length, m")}
                            {header("is_oneway", "One-way")}
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let needle = filter.get();
                            rows.get().0.into_iter().map(|row| {
                                let id = row.id.clone();
                                let is_pending = store.snapshot().with(|s| s.is_pending(&id));
                                view! {
                                    <tr class="table__row" class:table__row--pending=is_pending>
                                        <td class="table__cell">{highlight_matches(&row.english_name, &needle)}</td>
                                        <td class="table__cell">{highlight_matches(&row.burmese_name, &needle)}</td>
                                        <td class="table__cell">{highlight_matches(&row.road_type, &needle)}</td>
                                        <td class="table__cell">{row.coordinates.len()}</td>
                                        <td class="table__cell">{format_number_with_decimals(row.total_length(), 1, ' ')}</td>
                                        <td class="table__cell">{if row.is_oneway { "Yes" } else { "No" }}</td>
                                        <td class="table__cell table__cell--actions">
                                            <button
                                                class="button button--secondary"
                                                disabled=is_pending
                                                on:click=move |_| handle_delete(id.clone())
                                            >
                                                {"Delete"}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view()
                        }}
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
