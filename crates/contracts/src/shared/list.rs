use serde::{Deserialize, Serialize};

/// `{ "data": [...] }` wrapper used by the admin list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for DataEnvelope<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// A page of a cursor-paginated listing.
pub trait CursorPage {
    type Item;

    fn items(&self) -> &[Self::Item];

    /// Cursor for the following page; `None` on the last page.
    fn next_cursor(&self) -> Option<i64>;
}

/// `{ "data": {...} }` wrapper returned by create/update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope<T> {
    pub data: T,
}
