use serde::{Deserialize, Serialize};

/// Product identity as issued by the storefront API.
pub type ProductId = i64;

/// Upper bound accepted by the quantity editor.
pub const MAX_QUANTITY: u32 = 9999;

// ============================================================================
// Line item
// ============================================================================

/// One product entry in the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

impl CartItem {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity,
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// `price × quantity`
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

// ============================================================================
// Quantity editor rules
// ============================================================================

/// Parse the raw text of the quantity input: 1–4 ASCII digits.
pub fn parse_quantity_input(input: &str) -> Result<u32, String> {
    if input.is_empty() {
        return Err("Must not be empty".into());
    }
    if input.len() > 4 {
        return Err("Too Many! Is it real?".into());
    }
    if !input.chars().all(|c| c.is_ascii_digit()) {
        return Err("Must be a number".into());
    }
    input.parse::<u32>().map_err(|e| e.to_string())
}

pub fn increase_quantity(current: u32) -> u32 {
    (current + 1).min(MAX_QUANTITY)
}

pub fn decrease_quantity(current: u32) -> u32 {
    current.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = CartItem::new(1, "Oak chair", 120.5, 2);
        assert_eq!(item.line_total(), 241.0);
    }

    #[test]
    fn test_parse_quantity_input() {
        assert_eq!(parse_quantity_input("12"), Ok(12));
        assert_eq!(parse_quantity_input("0"), Ok(0));
        assert_eq!(parse_quantity_input(""), Err("Must not be empty".to_string()));
        assert_eq!(parse_quantity_input("12345"), Err("Too Many! Is it real?".to_string()));
        assert_eq!(parse_quantity_input("1a"), Err("Must be a number".to_string()));
        assert_eq!(parse_quantity_input("-1"), Err("Must be a number".to_string()));
    }

    #[test]
    fn test_quantity_clamps() {
        assert_eq!(increase_quantity(MAX_QUANTITY), MAX_QUANTITY);
        assert_eq!(increase_quantity(3), 4);
        assert_eq!(decrease_quantity(0), 0);
        assert_eq!(decrease_quantity(3), 2);
    }

    #[test]
    fn test_missing_quantity_deserializes_to_zero() {
        let item: CartItem =
            serde_json::from_str(r#"{"id":4,"name":"Lamp","price":10.0}"#).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.image, "");
    }
}
