use contracts::domain::a002_product::aggregate::{Category, FilterTypes};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use thaw::*;

use crate::domain::a002_product::api::{fetch_filter_types, filter_types_key};
use crate::domain::a002_product::filter_store::{parse_ids, use_filter_store, PRODUCTS_PATH};
use crate::layout::global_context::use_global_context;

/// `csv` with `id` added, or removed when it is already there
pub fn toggle_id(csv: &str, id: i64) -> String {
    let mut ids = parse_ids(csv);
    match ids.iter().position(|existing| *existing == id) {
        Some(index) => {
            ids.remove(index);
        }
        None => ids.push(id),
    }
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn is_selected(csv: &str, id: i64) -> bool {
    parse_ids(csv).contains(&id)
}

fn checkbox_group(
    title: &'static str,
    options: Vec<Category>,
    selection: RwSignal<String>,
) -> impl IntoView {
    view! {
        <fieldset class="filter-panel__group">
            <legend>{title}</legend>
            {options.into_iter().map(|option| {
                let id = option.id;
                view! {
                    <label class="filter-panel__option">
                        <input
                            type="checkbox"
                            prop:checked=move || selection.with(|csv| is_selected(csv, id))
                            on:change=move |_| selection.update(|csv| *csv = toggle_id(csv, id))
                        />
                        {option.name}
                    </label>
                }
            }).collect_view()}
        </fieldset>
    }
}

/// Category/type checkboxes; "Apply" moves to the filtered product list
#[component]
pub fn FilterPanel() -> impl IntoView {
    let ctx = use_global_context();
    let filters = use_filter_store();
    let navigate = use_navigate();

    let initial = untrack(|| filters.state());
    let categories = RwSignal::new(initial.categories);
    let types = RwSignal::new(initial.types);

    let options = RwSignal::new(None::<FilterTypes>);
    let load_error = RwSignal::new(None::<String>);

    let load = move || {
        load_error.set(None);
        let client = ctx.api();
        let queries = ctx.queries();
        spawn_local(async move {
            match queries
                .fetch_query(filter_types_key(), || fetch_filter_types(&client))
                .await
            {
                Ok(types) => options.set(Some(types)),
                Err(e) => {
                    log::warn!("filter types not loaded: {}", e);
                    load_error.set(Some(e.to_string()));
                }
            }
        });
    };
    load();

    let nav_apply = navigate.clone();
    let apply = move |_| {
        filters.add_categories(&categories.get_untracked());
        filters.add_types(&types.get_untracked());
        nav_apply(&untrack(|| filters.filter_link()), Default::default());
    };

    let clear = move |_| {
        filters.clear_filter();
        categories.set(String::new());
        types.set(String::new());
        navigate(PRODUCTS_PATH, Default::default());
    };

    view! {
        <aside class="filter-panel">
            {move || load_error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load()>
                        "Retry"
                    </Button>
                </div>
            })}
            {move || match options.get() {
                None => view! { <Spinner /> }.into_any(),
                Some(loaded) => view! {
                    <div>
                        {checkbox_group("Categories", loaded.categories, categories)}
                        {checkbox_group("Types", loaded.types, types)}
                    </div>
                }.into_any(),
            }}
            <Flex gap=FlexGap::Small>
                <Button appearance=ButtonAppearance::Primary on_click=apply>
                    "Apply"
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=clear>
                    "Clear"
                </Button>
            </Flex>
        </aside>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_id() {
        assert_eq!(toggle_id("", 3), "3");
        assert_eq!(toggle_id("1,3", 3), "1");
        assert_eq!(toggle_id("1,x", 2), "1,2");
        assert_eq!(toggle_id("4", 4), "");
    }

    #[test]
    fn test_is_selected_ignores_junk() {
        assert!(is_selected("1, 2", 2));
        assert!(!is_selected("12", 1));
    }
}
