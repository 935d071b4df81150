/// Универсальные утилиты для работы со списками (поиск, сортировка, страницы, UI компоненты)
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use std::cmp::Ordering;

/// Фильтр активен начиная с этого количества символов
pub const MIN_FILTER_CHARS: usize = 1;

/// Строк на странице админских таблиц
pub const PAGE_SIZE: usize = 10;

const SEARCH_DEBOUNCE_MS: u32 = 300;

/// Trait для типов данных, поддерживающих поиск
pub trait Searchable {
    /// Проверяет, соответствует ли объект поисковому запросу
    fn matches_filter(&self, filter: &str) -> bool;
}

/// Trait для типов данных, поддерживающих сортировку
pub trait Sortable {
    /// Сравнивает два объекта по указанному полю
    fn compare_by_field(&self, other: &Self, field: &str) -> Ordering;
}

/// Case-insensitive substring check used by `Searchable` impls
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

pub fn is_filter_active(filter: &str) -> bool {
    filter.trim().chars().count() >= MIN_FILTER_CHARS
}

/// Подсветка совпадений в тексте (case-insensitive)
pub fn highlight_matches(text: &str, filter: &str) -> AnyView {
    let filter = filter.trim();
    if !is_filter_active(filter) {
        return view! { <span>{text.to_string()}</span> }.into_any();
    }

    let parts: Vec<AnyView> = split_matches(text, filter)
        .into_iter()
        .map(|(part, hit)| {
            if hit {
                view! { <mark class="search-hit">{part}</mark> }.into_any()
            } else {
                view! { <span>{part}</span> }.into_any()
            }
        })
        .collect();

    view! { <>{parts}</> }.into_any()
}

/// Split `text` into `(fragment, is_match)` runs
fn split_matches(text: &str, filter: &str) -> Vec<(String, bool)> {
    let filter_lower = filter.to_lowercase();
    let text_lower = text.to_lowercase();
    // lowercasing can change byte lengths; fall back to no highlighting then
    if filter_lower.is_empty() || text_lower.len() != text.len() {
        return vec![(text.to_string(), false)];
    }

    let mut parts = Vec::new();
    let mut last_pos = 0;
    while let Some(pos) = text_lower[last_pos..].find(&filter_lower) {
        let start = last_pos + pos;
        let end = start + filter_lower.len();
        if start > last_pos {
            parts.push((text[last_pos..start].to_string(), false));
        }
        parts.push((text[start..end].to_string(), true));
        last_pos = end;
    }
    if last_pos < text.len() {
        parts.push((text[last_pos..].to_string(), false));
    }
    parts
}

/// Сортирует список по указанному полю
pub fn sort_list<T: Sortable>(items: &mut [T], field: &str, ascending: bool) {
    items.sort_by(|a, b| {
        let cmp = a.compare_by_field(b, field);
        if ascending {
            cmp
        } else {
            cmp.reverse()
        }
    });
}

/// Фильтрует список по поисковому запросу
pub fn filter_list<T: Searchable>(items: Vec<T>, filter: &str) -> Vec<T> {
    if !is_filter_active(filter) {
        return items;
    }

    items
        .into_iter()
        .filter(|item| item.matches_filter(filter))
        .collect()
}

/// Number of pages for `total` rows; at least one
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Clamp a zero-based page index into range
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.min(page_count(total, page_size) - 1)
}

/// Rows of one page (page index is clamped)
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Vec<T> {
    if page_size == 0 {
        return items.to_vec();
    }
    let page = clamp_page(page, items.len(), page_size);
    items
        .iter()
        .skip(page * page_size)
        .take(page_size)
        .cloned()
        .collect()
}

/// Компонент поиска с debounce и кнопкой очистки
#[component]
pub fn SearchInput(
    /// Текущее значение фильтра (для подсветки)
    #[prop(into)]
    value: Signal<String>,
    /// Callback для обновления значения фильтра
    #[prop(into)]
    on_change: Callback<String>,
    /// Placeholder текст
    #[prop(optional, into)]
    placeholder: String,
) -> impl IntoView {
    let placeholder = if placeholder.is_empty() {
        "Search...".to_string()
    } else {
        placeholder
    };

    // Локальное состояние для input (до debounce)
    let (input_value, set_input_value) = signal(value.get_untracked());

    // Replacing the stored timeout drops (cancels) the previous one
    let debounce = StoredValue::new_local(None::<Timeout>);

    let handle_input_change = move |new_value: String| {
        set_input_value.set(new_value.clone());
        let timeout = Timeout::new(SEARCH_DEBOUNCE_MS, move || on_change.run(new_value));
        debounce.set_value(Some(timeout));
    };

    let clear_filter = move |_| {
        debounce.set_value(None);
        set_input_value.set(String::new());
        on_change.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="text"
                placeholder=placeholder
                class:search-input--active=move || is_filter_active(&value.get())
                prop:value=move || input_value.get()
                on:input=move |ev| handle_input_change(event_target_value(&ev))
            />
            <Show when=move || !input_value.get().is_empty()>
                <button class="search-input__clear" on:click=clear_filter title="Clear">
                    "✕"
                </button>
            </Show>
        </div>
    }
}

/// Получить индикатор сортировки для заголовка
pub fn get_sort_indicator(current_field: &str, field: &str, ascending: bool) -> &'static str {
    if current_field == field {
        if ascending {
            " ▲"
        } else {
            " ▼"
        }
    } else {
        " ⇅"
    }
}

/// Clicking the active column flips direction, another column sorts ascending
pub fn toggle_sort(current_field: &str, ascending: bool, clicked: &str) -> (String, bool) {
    if current_field == clicked {
        (clicked.to_string(), !ascending)
    } else {
        (clicked.to_string(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        size: u32,
    }

    impl Searchable for Row {
        fn matches_filter(&self, filter: &str) -> bool {
            contains_ci(self.name, filter)
        }
    }

    impl Sortable for Row {
        fn compare_by_field(&self, other: &Self, field: &str) -> Ordering {
            match field {
                "size" => self.size.cmp(&other.size),
                _ => self.name.cmp(other.name),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Market Street", size: 3 },
            Row { name: "Bogyoke Road", size: 1 },
            Row { name: "Strand Road", size: 2 },
        ]
    }

    #[test]
    fn test_sort_list_both_directions() {
        let mut items = rows();
        sort_list(&mut items, "size", true);
        assert_eq!(items.iter().map(|r| r.size).collect::<Vec<_>>(), vec![1, 2, 3]);
        sort_list(&mut items, "name", false);
        assert_eq!(items[0].name, "Strand Road");
    }

    #[test]
    fn test_filter_list_single_char_is_active() {
        assert_eq!(filter_list(rows(), "").len(), 3);
        assert_eq!(filter_list(rows(), "   ").len(), 3);
        assert_eq!(filter_list(rows(), "k").len(), 2);
        assert_eq!(filter_list(rows(), "ROAD").len(), 2);
        assert!(filter_list(rows(), "zzz").is_empty());
    }

    #[test]
    fn test_pagination_clamps() {
        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(page_count(items.len(), PAGE_SIZE), 3);
        assert_eq!(page_count(0, PAGE_SIZE), 1);
        assert_eq!(paginate(&items, 0, PAGE_SIZE).len(), 10);
        assert_eq!(paginate(&items, 2, PAGE_SIZE), vec![21, 22, 23]);
        // past the end shows the last page
        assert_eq!(paginate(&items, 9, PAGE_SIZE), vec![21, 22, 23]);
        assert_eq!(clamp_page(5, 0, PAGE_SIZE), 0);
    }

    #[test]
    fn test_split_matches() {
        assert_eq!(
            split_matches("Strand Road", "road"),
            vec![("Strand ".to_string(), false), ("Road".to_string(), true)]
        );
        assert_eq!(split_matches("abc", "x"), vec![("abc".to_string(), false)]);
    }

    #[test]
    fn test_sort_helpers() {
        assert_eq!(get_sort_indicator("name", "name", true), " ▲");
        assert_eq!(get_sort_indicator("name", "name", false), " ▼");
        assert_eq!(get_sort_indicator("name", "type", true), " ⇅");
        assert_eq!(toggle_sort("name", true, "name"), ("name".to_string(), false));
        assert_eq!(toggle_sort("name", false, "type"), ("type".to_string(), true));
    }
}
