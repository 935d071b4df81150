//! Navigator sidebar: map link for everyone, admin console for admins

use crate::system::auth::context::use_auth;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;

#[derive(Clone, Debug, PartialEq)]
pub struct MenuGroup {
    pub id: &'static str,
    pub label: &'static str,
    pub items: Vec<(&'static str, &'static str, &'static str)>, // (path, label, icon)
    pub admin_only: bool,
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "navigation",
            label: "Navigation",
            items: vec![("/", "Map", "🗺")],
            admin_only: false,
        },
        MenuGroup {
            id: "admin",
            label: "Admin",
            items: vec![
                ("/admin/locations", "Locations", "📍"),
                ("/admin/roads", "Roads", "🛣"),
            ],
            admin_only: true,
        },
    ]
}

pub fn visible_groups(is_admin: bool) -> Vec<MenuGroup> {
    get_menu_groups()
        .into_iter()
        .filter(|group| is_admin || !group.admin_only)
        .collect()
}

/// `path` is `item` or one of its sub-pages; the map root only matches itself
pub fn is_active(path: &str, item: &str) -> bool {
    if item == "/" {
        return path == "/";
    }
    path == item || path.starts_with(&format!("{}/", item))
}

#[component]
pub fn AdminSidebar() -> impl IntoView {
    let auth = use_auth();
    let location = use_location();

    view! {
        <nav class="app-sidebar__content">
            {move || visible_groups(auth.is_admin()).into_iter().map(|group| view! {
                <div class="app-sidebar__group" data-group=group.id>
                    <div class="app-sidebar__group-label">{group.label}</div>
                    {group.items.into_iter().map(|(path, label, icon)| view! {
                        <A href=path>
                            <div
                                class="app-sidebar__item"
                                class:app-sidebar__item--active=move || location.pathname.with(|p| is_active(p, path))
                            >
                                <span class="app-sidebar__icon">{icon}</span>
                                <span>{label}</span>
                            </div>
                        </A>
                    }).collect_view()}
                </div>
            }).collect_view()}
        </nav>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_group_hidden_for_users() {
        assert_eq!(visible_groups(false).len(), 1);
        assert_eq!(visible_groups(true).len(), 2);
        assert!(visible_groups(true).iter().any(|g| g.admin_only));
    }

    #[test]
    fn test_is_active() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/admin/roads", "/"));
        assert!(is_active("/admin/locations/update/7", "/admin/locations"));
        assert!(!is_active("/admin/locationsx", "/admin/locations"));
    }
}
