//! Location create/edit form
//!
//! - view_model.rs: form state, parsing and the save command
//! - view.rs: Leptos component

mod view;
mod view_model;

pub use view::LocationDetails;
pub use view_model::{LocationDetailsViewModel, LocationForm};
