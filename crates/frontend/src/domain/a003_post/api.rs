use contracts::domain::a003_post::aggregate::{Post, PostDetail, PostPage};

use crate::shared::http::{ApiClient, ApiError};
use crate::shared::query::QueryKey;

pub fn post_list_key() -> QueryKey {
    QueryKey::new(["posts", "infinite"])
}

pub fn post_detail_key(id: i64) -> QueryKey {
    QueryKey::new(["post".to_string(), "detail".to_string(), id.to_string()])
}

pub fn posts_path(limit: u32, cursor: Option<i64>) -> String {
    match cursor {
        Some(cursor) => format!("/user/posts?limit={}&cursor={}", limit, cursor),
        None => format!("/user/posts?limit={}", limit),
    }
}

pub async fn fetch_posts_page(
    client: &ApiClient,
    limit: u32,
    cursor: Option<i64>,
) -> Result<PostPage, ApiError> {
    client.get_json(&posts_path(limit, cursor)).await
}

pub async fn fetch_post(client: &ApiClient, id: i64) -> Result<Post, ApiError> {
    let detail: PostDetail = client.get_json(&format!("/user/posts/{}", id)).await?;
    Ok(detail.post)
}
