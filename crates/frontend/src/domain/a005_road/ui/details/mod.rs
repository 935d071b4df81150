//! Road creation form: names, type and an ordered list of points picked from
//! the cached locations.

mod view;
mod view_model;

pub use view::RoadDetails;
pub use view_model::{RoadDetailsViewModel, RoadForm, RoadPoint};
