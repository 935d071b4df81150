//! Top bars of the two apps.
//!
//! Storefront: brand, shop/blog/account links, cart badge and the account area.
//! Navigator: sidebar toggle, brand and the account area.

use crate::domain::a001_cart::ui::CartBadge;
use crate::layout::global_context::use_global_context;
use crate::system::auth::context::use_auth;
use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use thaw::*;

/// Signed-in user name with a sign-out button, or a sign-in link
#[component]
fn AccountArea() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let logout = move |_| {
        auth.clear_auth();
        log::info!("auth: signed out");
        navigate("/", Default::default());
    };

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! { <A href="/login">"Sign in"</A> }
        >
            <div class="top-header__user">
                <span>
                    {move || auth.user().map(|u| u.display_name()).unwrap_or_default()}
                </span>
            </div>
            <Button appearance=ButtonAppearance::Subtle on_click=logout.clone()>
                "Sign out"
            </Button>
        </Show>
    }
}

#[component]
pub fn StorefrontHeader() -> impl IntoView {
    let auth = use_auth();

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <A href="/">
                    <span class="top-header__title">"Teak & Rattan"</span>
                </A>
            </div>
            <nav class="top-header__nav">
                <A href="/products">"Shop"</A>
                <A href="/blog">"Blog"</A>
                <Show when=move || auth.is_authenticated()>
                    <A href="/account-setting">"Account"</A>
                </Show>
            </nav>
            <div class="top-header__actions">
                <CartBadge />
                <AccountArea />
            </div>
        </div>
    }
}

#[component]
pub fn NavigatorHeader() -> impl IntoView {
    let ctx = use_global_context();
    let is_sidebar_visible = move || ctx.left_open.get();

    view! {
        <div class="top-header">
            <button
                class="top-header__icon-btn"
                on:click=move |_| ctx.toggle_left()
                title=move || if is_sidebar_visible() { "Hide navigation" } else { "Show navigation" }
            >
                "☰"
            </button>
            <div class="top-header__brand">
                <span class="top-header__title">"Maubin Navigator"</span>
            </div>
            <div class="top-header__actions">
                <AccountArea />
            </div>
        </div>
    }
}
