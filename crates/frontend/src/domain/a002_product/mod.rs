pub mod api;
pub mod filter_store;
pub mod ui;
