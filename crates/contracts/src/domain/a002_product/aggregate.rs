use crate::domain::a001_cart::aggregate::{CartItem, ProductId};
use crate::shared::list::CursorPage;
use serde::{Deserialize, Serialize};

// ============================================================================
// Product
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub path: String,
}

/// Товар витрины
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<ProductImage>,
    #[serde(default)]
    pub category_id: String,
    pub price: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub inventory: i64,
    #[serde(default)]
    pub status: String,
    /// Users who marked the product as favourite; for the signed-in user the
    /// API returns either an empty list or just that user.
    #[serde(default)]
    pub users: Vec<serde_json::Value>,
}

impl Product {
    pub fn is_favourite(&self) -> bool {
        !self.users.is_empty()
    }

    /// Mark or unmark as favourite locally (optimistic toggle).
    pub fn set_favourite(&mut self, favourite: bool) {
        if favourite {
            if self.users.is_empty() {
                self.users.push(serde_json::Value::Null);
            }
        } else {
            self.users.clear();
        }
    }

    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(|i| i.path.as_str())
    }

    pub fn in_stock(&self) -> bool {
        self.inventory > 0 && self.status != "INACTIVE"
    }

    /// Build the cart line for "add to cart".
    pub fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem::new(self.id, self.name.clone(), self.price, quantity)
            .with_image(self.first_image().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub next_cursor: Option<i64>,
}

impl CursorPage for ProductPage {
    type Item = Product;

    fn items(&self) -> &[Product] {
        &self.products
    }

    fn next_cursor(&self) -> Option<i64> {
        self.next_cursor
    }
}

/// Response of `GET /user/products/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub product: Product,
}

// ============================================================================
// Filter reference data
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Response of `GET /user/filter-type`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterTypes {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub types: Vec<Category>,
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `PATCH /user/products/toggle-favourite`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFavouriteRequest {
    pub product_id: ProductId,
    pub favourite: bool,
}

/// Query string of `GET /user/products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductListQuery {
    pub limit: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Walnut table",
            "description": "Solid walnut",
            "images": [{ "id": 1, "path": "table.png" }],
            "categoryId": "2",
            "price": 450.0,
            "discount": 0.0,
            "rating": 4.0,
            "inventory": 5,
            "status": "ACTIVE",
            "users": []
        }))
        .unwrap()
    }

    #[test]
    fn test_to_cart_item_uses_first_image() {
        let item = sample().to_cart_item(2);
        assert_eq!(item.id, 3);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.image, "table.png");
    }

    #[test]
    fn test_favourite_toggle() {
        let mut product = sample();
        assert!(!product.is_favourite());
        product.set_favourite(true);
        assert!(product.is_favourite());
        product.set_favourite(true);
        assert_eq!(product.users.len(), 1);
        product.set_favourite(false);
        assert!(!product.is_favourite());
    }

    #[test]
    fn test_page_cursor() {
        let page: ProductPage =
            serde_json::from_str(r#"{"products":[],"nextCursor":16}"#).unwrap();
        assert_eq!(page.next_cursor(), Some(16));
        let last: ProductPage = serde_json::from_str(r#"{"products":[]}"#).unwrap();
        assert_eq!(last.next_cursor(), None);
    }
}
