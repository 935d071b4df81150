pub mod api_utils;
pub mod clock;
pub mod config;
pub mod format;
pub mod http;
pub mod list_utils;
pub mod query;
pub mod reference_cache;
pub mod reference_store;
pub mod storage;
