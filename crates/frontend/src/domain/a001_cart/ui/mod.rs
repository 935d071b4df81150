pub mod quantity;
pub mod sheet;

pub use quantity::{QuantityDraft, QuantityEditor};
pub use sheet::{CartBadge, CartSheet};
