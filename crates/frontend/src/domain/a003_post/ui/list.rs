use contracts::domain::a003_post::aggregate::{Post, PostPage};
use leptos::prelude::*;
use leptos_router::components::A;
use thaw::*;

use crate::domain::a003_post::api::{fetch_posts_page, post_list_key};
use crate::layout::global_context::use_global_context;
use crate::shared::format::format_date;
use crate::shared::query::InfiniteList;

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    match trimmed.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", trimmed[..cut].trim_end()),
        None => trimmed.to_string(),
    }
}

#[component]
fn PostCard(post: Post) -> impl IntoView {
    let ctx = use_global_context();
    let href = format!("/blog/{}", post.id);
    let image = (!post.image.is_empty()).then(|| ctx.image_url(&post.image));
    let title = post.title.clone();
    let alt = post.title.clone();
    let meta = format!("{} · {}", post.author.full_name, format_date(&post.updated_at));
    let summary = excerpt(&post.content, 160);
    let tags: Vec<String> = post.tag_names().into_iter().map(str::to_string).collect();

    view! {
        <Card class="post-card">
            {image.map(move |src| view! { <img class="post-card__image" src=src alt=alt /> })}
            <A href=href>
                <h3 class="post-card__title">{title}</h3>
            </A>
            <p class="post-card__meta">{meta}</p>
            <p class="post-card__excerpt">{summary}</p>
            <Space>
                {tags.into_iter().map(|tag| view! {
                    <Badge appearance=BadgeAppearance::Tint>{tag}</Badge>
                }).collect_view()}
            </Space>
        </Card>
    }
}

/// Blog posts, newest first, with a "load more" button
#[component]
pub fn PostList() -> impl IntoView {
    let ctx = use_global_context();
    let list: InfiniteList<PostPage> = InfiniteList::new(post_list_key(), &ctx.queries());
    let state = list.state();

    let load_more = move || {
        let client = ctx.api();
        let limit = ctx.config().cache.posts_page_size;
        list.load_more(ctx.queries(), move |cursor| async move {
            fetch_posts_page(&client, limit, cursor).await
        });
    };

    if !state.with_untracked(|q| q.is_started()) {
        load_more();
    }

    view! {
        <div class="page blog">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">"Blog"</h1>
                </div>
            </div>
            {move || state.with(|q| q.error().map(str::to_string)).map(|e| view! {
                <div class="warning-box">
                    <span class="warning-box__icon">"⚠"</span>
                    <span class="warning-box__text">{e}</span>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_more()>
                        "Retry"
                    </Button>
                </div>
            })}
            <div class="post-grid">
                {move || state.with(|q| q.items().cloned().collect::<Vec<_>>())
                    .into_iter()
                    .map(|post| view! { <PostCard post=post /> })
                    .collect_view()}
            </div>
            <Show when=move || state.with(|q| q.is_loading())>
                <Spinner />
            </Show>
            <Show when=move || state.with(|q| q.has_next_page() && !q.is_loading())>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| load_more()>
                    "Load more"
                </Button>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("  Short post  ", 20), "Short post");
        assert_eq!(excerpt("Teak lasts for decades", 10), "Teak lasts…");
        assert_eq!(excerpt("ñandú rápido", 3), "ñan…");
    }
}
