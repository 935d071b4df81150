pub mod client;
pub mod infinite;
pub mod infinite_list;

pub use client::{QueryClient, QueryKey};
pub use infinite::{InfiniteQuery, NextPage};
pub use infinite_list::InfiniteList;
