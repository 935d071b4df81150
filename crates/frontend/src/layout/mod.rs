pub mod global_context;
pub mod left;
pub mod top_header;

use leptos::prelude::*;

/// Application shell.
///
/// ```text
/// +------------------------------------------+
/// |                 header                   |
/// +------------------------------------------+
/// |  left (optional)  |       content        |
/// +------------------------------------------+
/// ```
#[component]
pub fn Shell<H, L>(header: H, left: L, children: Children) -> impl IntoView
where
    H: Fn() -> AnyView + 'static + Send,
    L: Fn() -> AnyView + 'static + Send,
{
    view! {
        <div class="app-layout">
            {header()}
            <div class="app-body">
                <left::Left>
                    {left()}
                </left::Left>
                <main class="app-main">
                    {children()}
                </main>
            </div>
        </div>
    }
}
