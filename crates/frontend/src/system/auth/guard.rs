use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;
use thaw::Spinner;

use super::context::use_auth;
use super::storage::AdminAccess;

/// Component that requires authentication
/// Shows a sign-in prompt if not authenticated
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();

    view! {
        <Show
            when=move || auth.is_authenticated()
            fallback=|| view! {
                <div class="auth-required">
                    <p>"Not authenticated. Please sign in."</p>
                    <A href="/login">"Sign in"</A>
                </div>
            }
        >
            {children()}
        </Show>
    }
}

/// Admin-only pages. Waits for the stored session, then sends anyone who
/// is not an admin to `/login`.
#[component]
pub fn RequireAdmin(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let access = Memo::new(move |_| auth.admin_access());

    Effect::new(move |_| {
        if access.get() == AdminAccess::Denied {
            log::warn!("auth: admin area refused, redirecting to /login");
            navigate("/login", Default::default());
        }
    });

    view! {
        <Show when=move || access.get() == AdminAccess::Granted fallback=|| view! { <Spinner /> }>
            {children()}
        </Show>
    }
}
