use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes, A};
use leptos_router::hooks::use_params_map;
use leptos_router::path;

use crate::domain::a001_cart::ui::CartSheet;
use crate::domain::a002_product::ui::{ProductDetails, ProductList};
use crate::domain::a003_post::ui::{PostDetails, PostList};
use crate::domain::a004_location::ui::details::LocationDetails;
use crate::domain::a004_location::ui::list::LocationList;
use crate::domain::a005_road::ui::details::RoadDetails;
use crate::domain::a005_road::ui::list::RoadList;
use crate::domain::a006_route::ui::map_view::MapView;
use crate::layout::left::AdminSidebar;
use crate::layout::top_header::{NavigatorHeader, StorefrontHeader};
use crate::layout::Shell;
use crate::system::auth::guard::{RequireAdmin, RequireAuth};
use crate::system::pages::account_setting::AccountSettingPage;
use crate::system::pages::login::LoginPage;
use crate::system::pages::register::RegisterPage;

#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="page empty-state">
            <h1>"Page not found"</h1>
            <A href="/">"Go home"</A>
        </div>
    }
}

#[component]
fn StorefrontLogin() -> impl IntoView {
    view! { <LoginPage allow_register=true /> }
}

#[component]
fn AccountPage() -> impl IntoView {
    view! { <RequireAuth><AccountSettingPage /></RequireAuth> }
}

#[component]
pub fn StorefrontRoutes() -> impl IntoView {
    view! {
        <Router>
            <Shell
                header=|| view! { <StorefrontHeader /> }.into_any()
                left=|| ().into_any()
            >
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=ProductList />
                    <Route path=path!("/products") view=ProductList />
                    <Route path=path!("/products/:id") view=ProductDetails />
                    <Route path=path!("/blog") view=PostList />
                    <Route path=path!("/blog/:id") view=PostDetails />
                    <Route path=path!("/login") view=StorefrontLogin />
                    <Route path=path!("/register") view=RegisterPage />
                    <Route path=path!("/account-setting") view=AccountPage />
                </Routes>
            </Shell>
            <CartSheet />
        </Router>
    }
}

/// Stored route from `/map/:id`
#[component]
fn HistoryMap() -> impl IntoView {
    let params = use_params_map();
    let route_id = Memo::new(move |_| params.with(|p| p.get("id")));

    move || match route_id.get() {
        Some(id) => view! { <MapView route_id=id /> }.into_any(),
        None => view! { <NotFound /> }.into_any(),
    }
}

#[component]
fn LocationsPage() -> impl IntoView {
    view! { <RequireAdmin><LocationList /></RequireAdmin> }
}

#[component]
fn LocationCreatePage() -> impl IntoView {
    view! { <RequireAdmin><LocationDetails /></RequireAdmin> }
}

#[component]
fn LocationEditPage() -> impl IntoView {
    let params = use_params_map();
    let id = Memo::new(move |_| params.with(|p| p.get("id")));

    view! {
        <RequireAdmin>
            {move || match id.get() {
                Some(id) => view! { <LocationDetails id=id /> }.into_any(),
                None => view! { <NotFound /> }.into_any(),
            }}
        </RequireAdmin>
    }
}

#[component]
fn RoadsPage() -> impl IntoView {
    view! { <RequireAdmin><RoadList /></RequireAdmin> }
}

#[component]
fn RoadCreatePage() -> impl IntoView {
    view! { <RequireAdmin><RoadDetails /></RequireAdmin> }
}

#[component]
fn NavigatorLogin() -> impl IntoView {
    view! { <LoginPage redirect_to="/admin/locations" /> }
}

#[component]
pub fn NavigatorRoutes() -> impl IntoView {
    view! {
        <Router>
            <Shell
                header=|| view! { <NavigatorHeader /> }.into_any()
                left=|| view! { <AdminSidebar /> }.into_any()
            >
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=|| view! { <MapView /> } />
                    <Route path=path!("/map/:id") view=HistoryMap />
                    <Route path=path!("/admin/locations") view=LocationsPage />
                    <Route path=path!("/admin/locations/create") view=LocationCreatePage />
                    <Route path=path!("/admin/locations/update/:id") view=LocationEditPage />
                    <Route path=path!("/admin/roads") view=RoadsPage />
                    <Route path=path!("/admin/roads/create") view=RoadCreatePage />
                    <Route path=path!("/login") view=NavigatorLogin />
                </Routes>
            </Shell>
        </Router>
    }
}
