use contracts::domain::a006_route::aggregate::{RouteRequest, RouteResult};

use crate::shared::api_utils::path_segment;
use crate::shared::http::{ApiClient, ApiError};

pub async fn request_route(client: &ApiClient, request: &RouteRequest) -> Result<RouteResult, ApiError> {
    let result: RouteResult = client.post_json("/routes", request).await?;
    log::info!(
        "route {}: {} points, {} m",
        result.route_id,
        result.coordinates().len(),
        result.distance
    );
    Ok(result)
}

/// A route computed earlier, by its id
pub async fn fetch_route_history(client: &ApiClient, route_id: &str) -> Result<RouteResult, ApiError> {
    client
        .get_json(&format!("/history/{}", path_segment(route_id)))
        .await
}
