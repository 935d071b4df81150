pub mod details;
pub mod list;

pub use details::PostDetails;
pub use list::PostList;
