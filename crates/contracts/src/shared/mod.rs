pub mod action_result;
pub mod geo;
pub mod list;
pub mod validation;

pub use action_result::ActionResult;
pub use geo::LngLat;
pub use list::{CursorPage, DataEnvelope, ItemEnvelope};
pub use validation::ValidationErrors;
