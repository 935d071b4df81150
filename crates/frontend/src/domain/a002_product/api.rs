use contracts::domain::a001_cart::aggregate::ProductId;
use contracts::domain::a002_product::aggregate::{
    FilterTypes, Product, ProductDetail, ProductListQuery, ProductPage, ToggleFavouriteRequest,
};
use serde_json::Value;

use super::filter_store::FilterState;
use crate::shared::http::{ApiClient, ApiError};
use crate::shared::query::{QueryClient, QueryKey};

pub fn products_key() -> QueryKey {
    QueryKey::new(["products"])
}

/// Key of the infinite product list for one filter selection
pub fn product_list_key(filter: &FilterState) -> QueryKey {
    QueryKey::new([
        "products".to_string(),
        "infinite".to_string(),
        filter.category_param().unwrap_or_default(),
        filter.type_param().unwrap_or_default(),
    ])
}

pub fn product_detail_key(id: ProductId) -> QueryKey {
    QueryKey::new(["products".to_string(), "detail".to_string(), id.to_string()])
}

pub fn filter_types_key() -> QueryKey {
    QueryKey::new(["category", "type"])
}

/// `/user/products?limit=..[&cursor=..][&category=..][&type=..]`
pub fn products_path(query: &ProductListQuery) -> Result<String, ApiError> {
    let qs = serde_qs::to_string(query).map_err(|e| ApiError::Serialize(e.to_string()))?;
    Ok(format!("/user/products?{}", qs))
}

pub async fn fetch_products_page(
    client: &ApiClient,
    limit: u32,
    cursor: Option<i64>,
    filter: &FilterState,
) -> Result<ProductPage, ApiError> {
    let query = ProductListQuery {
        limit,
        cursor,
        category: filter.category_param(),
        product_type: filter.type_param(),
    };
    client.get_json(&products_path(&query)?).await
}

pub async fn fetch_product(client: &ApiClient, id: ProductId) -> Result<Product, ApiError> {
    let detail: ProductDetail = client.get_json(&format!("/user/products/{}", id)).await?;
    Ok(detail.product)
}

pub async fn fetch_filter_types(client: &ApiClient) -> Result<FilterTypes, ApiError> {
    client.get_json("/user/filter-type").await
}

pub async fn toggle_favourite(
    client: &ApiClient,
    request: &ToggleFavouriteRequest,
) -> Result<(), ApiError> {
    let _: Value = client
        .patch_json("/user/products/toggle-favourite", request)
        .await?;
    Ok(())
}

/// Flip the cached product's favourite flag right away, then tell the server.
/// On failure the cached product is put back; on success every product key is
/// invalidated so lists pick up the change.
pub async fn toggle_favourite_optimistic<F, Fut>(
    queries: &QueryClient,
    id: ProductId,
    favourite: bool,
    send: F,
) -> Result<(), ApiError>
where
    F: FnOnce(ToggleFavouriteRequest) -> Fut,
    Fut: std::future::Future<Output = Result<(), ApiError>>,
{
    let key = product_detail_key(id);
    let previous = queries.update_query_data::<Product, _>(&key, |p| p.set_favourite(favourite));

    let request = ToggleFavouriteRequest {
        product_id: id,
        favourite,
    };
    match send(request).await {
        Ok(()) => {
            queries.invalidate(&products_key());
            Ok(())
        }
        Err(e) => {
            log::warn!("favourite toggle for product {} failed: {}", id, e);
            if let Some(previous) = previous {
                queries.set_query_data(key, previous);
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use futures::executor::block_on;

    fn product(id: ProductId) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": "Teak Chair",
            "price": 120.0,
            "users": []
        }))
        .unwrap()
    }

    #[test]
    fn test_products_path() {
        let query = ProductListQuery {
            limit: 8,
            ..Default::default()
        };
        assert_eq!(products_path(&query).unwrap(), "/user/products?limit=8");

        let query = ProductListQuery {
            limit: 8,
            cursor: Some(16),
            category: Some("1".into()),
            product_type: Some("2".into()),
        };
        assert_eq!(
            products_path(&query).unwrap(),
            "/user/products?limit=8&cursor=16&category=1&type=2"
        );
    }

    #[test]
    fn test_list_key_uses_canonical_ids() {
        let filter = FilterState::from_query(Some("1,x,2"), None);
        assert_eq!(
            product_list_key(&filter),
            QueryKey::new(["products", "infinite", "1,2", ""])
        );
        assert!(product_list_key(&filter).starts_with(&products_key()));
    }

    #[test]
    fn test_favourite_toggle_success_invalidates() {
        let queries = QueryClient::new(Duration::minutes(5));
        queries.set_query_data(product_detail_key(5), product(5));

        let sent = block_on(toggle_favourite_optimistic(&queries, 5, true, |req| async move {
            assert!(req.favourite);
            Ok(())
        }));

        assert!(sent.is_ok());
        let cached = queries.get_query_data::<Product>(&product_detail_key(5)).unwrap();
        assert!(cached.is_favourite());
        assert!(!queries.is_fresh(&product_detail_key(5)));
    }

    #[test]
    fn test_favourite_toggle_failure_restores() {
        let queries = QueryClient::new(Duration::minutes(5));
        queries.set_query_data(product_detail_key(5), product(5));

        let sent = block_on(toggle_favourite_optimistic(&queries, 5, true, |_| async {
            Err(ApiError::Unauthorized)
        }));

        assert_eq!(sent, Err(ApiError::Unauthorized));
        let cached = queries.get_query_data::<Product>(&product_detail_key(5)).unwrap();
        assert!(!cached.is_favourite());
    }
}
