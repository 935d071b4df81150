pub mod details;
pub mod filter_panel;
pub mod list;

pub use details::ProductDetails;
pub use filter_panel::FilterPanel;
pub use list::ProductList;
