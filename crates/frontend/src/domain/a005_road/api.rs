use contracts::domain::a005_road::aggregate::{Road, RoadDto};
use contracts::shared::{DataEnvelope, ItemEnvelope};

use crate::shared::api_utils::path_segment;
use crate::shared::http::{ApiClient, ApiError};

const ROADS_PATH: &str = "/admin/roads";

/// Every road comes back with its `geojson` filled in
pub async fn fetch_roads(client: &ApiClient) -> Result<Vec<Road>, ApiError> {
    let envelope: DataEnvelope<Road> = client.get_json(ROADS_PATH).await?;
    Ok(envelope
        .data
        .into_iter()
        .map(|mut road| {
            road.ensure_geojson();
            road
        })
        .collect())
}

pub async fn create_road(client: &ApiClient, dto: &RoadDto) -> Result<Road, ApiError> {
    let created: ItemEnvelope<Road> = client.post_json(ROADS_PATH, dto).await?;
    let mut road = created.data;
    road.ensure_geojson();
    Ok(road)
}

pub async fn delete_road(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .delete(&format!("{}/{}", ROADS_PATH, path_segment(id)))
        .await
}
