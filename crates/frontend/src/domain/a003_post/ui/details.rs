use contracts::domain::a003_post::aggregate::Post;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use thaw::*;

use crate::domain::a003_post::api::{fetch_post, post_detail_key};
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_date;
use crate::shared::http::ApiError;

#[component]
pub fn PostDetails() -> impl IntoView {
    let ctx = use_global_context();
    let params = use_params_map();

    let post_id = Memo::new(move |_| {
        params.with(|p| p.get_str("id").and_then(|id| id.parse::<i64>().ok()))
    });
    let post = RwSignal::new(None::<Post>);
    let error = RwSignal::new(None::<String>);
    let not_found = RwSignal::new(false);

    let load = move |id: i64| {
        error.set(None);
        not_found.set(false);
        let client = ctx.api();
        let queries = ctx.queries();
        spawn_local(async move {
            match queries
                .fetch_query(post_detail_key(id), || fetch_post(&client, id))
                .await
            {
                Ok(loaded) => post.set(Some(loaded)),
                Err(ApiError::NotFound) => not_found.set(true),
                Err(e) => {
                    log::warn!("post {} not loaded: {}", id, e);
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    Effect::new(move |_| {
        post.set(None);
        match post_id.get() {
            Some(id) => load(id),
            None => not_found.set(true),
        }
    });

    view! {
        <article class="page post-details">
            <A href="/blog">"← All posts"</A>
            {move || error.get().map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| {
                            if let Some(id) = post_id.get_untracked() {
                                load(id);
                            }
                        }
                    >
                        "Retry"
                    </Button>
                </div>
            })}
            <Show when=move || not_found.get()>
                <p class="empty-state">"This post does not exist."</p>
            </Show>
            <Show when=move || post.with(Option::is_none) && error.with(Option::is_none) && !not_found.get()>
                <Spinner />
            </Show>
            {move || post.get().map(|p| {
                let image = (!p.image.is_empty()).then(|| ctx.image_url(&p.image));
                let alt = p.title.clone();
                let meta = format!("{} · {}", p.author.full_name, format_date(&p.updated_at));
                let paragraphs: Vec<String> = p.body.lines().map(str::to_string).collect();
                let tags: Vec<String> = p.tag_names().into_iter().map(str::to_string).collect();
                view! {
                    <header class="post-details__header">
                        <h1>{p.title}</h1>
                        <p class="post-details__meta">{meta}</p>
                    </header>
                    {image.map(move |src| view! {
                        <img class="post-details__image" src=src alt=alt />
                    })}
                    <div class="post-details__body">
                        {paragraphs.into_iter().map(|line| view! { <p>{line}</p> }).collect_view()}
                    </div>
                    <Space>
                        {tags.into_iter().map(|tag| view! {
                            <Badge appearance=BadgeAppearance::Tint>{tag}</Badge>
                        }).collect_view()}
                    </Space>
                }
            })}
        </article>
    }
}
