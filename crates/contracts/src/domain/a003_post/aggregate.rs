use crate::shared::list::CursorPage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Статья блога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub author: Author,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Post {
    pub fn tag_names(&self) -> Vec<&str> {
        self.tags.iter().map(|t| t.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub next_cursor: Option<i64>,
}

impl CursorPage for PostPage {
    type Item = Post;

    fn items(&self) -> &[Post] {
        &self.posts
    }

    fn next_cursor(&self) -> Option<i64> {
        self.next_cursor
    }
}

/// Response of `GET /user/posts/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    pub post: Post,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_page_from_api() {
        let json = r#"{
            "posts": [{
                "id": 3,
                "author": {"fullName": "Aung Aung"},
                "title": "Caring for teak",
                "content": "Oil twice a year",
                "image": "teak.png",
                "body": "<p>...</p>",
                "updated_at": "2024-03-15T14:02:26.123Z",
                "tags": [{"name": "care"}, {"name": "wood"}]
            }],
            "nextCursor": 3
        }"#;
        let page: PostPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.next_cursor(), Some(3));
        assert_eq!(page.items()[0].author.full_name, "Aung Aung");
        assert_eq!(page.items()[0].tag_names(), vec!["care", "wood"]);
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let page: PostPage = serde_json::from_str(r#"{"posts": []}"#).unwrap();
        assert_eq!(page.next_cursor(), None);
    }
}
