use contracts::domain::a004_location::aggregate::{Location, LocationDto};
use contracts::shared::{DataEnvelope, ItemEnvelope};

use crate::shared::api_utils::path_segment;
use crate::shared::http::{ApiClient, ApiError};

const LOCATIONS_PATH: &str = "/admin/locations";

fn location_path(id: &str) -> String {
    format!("{}/{}", LOCATIONS_PATH, path_segment(id))
}

pub async fn fetch_locations(client: &ApiClient) -> Result<Vec<Location>, ApiError> {
    let envelope: DataEnvelope<Location> = client.get_json(LOCATIONS_PATH).await?;
    Ok(envelope.data)
}

pub async fn create_location(client: &ApiClient, dto: &LocationDto) -> Result<Location, ApiError> {
    let created: ItemEnvelope<Location> = client.post_json(LOCATIONS_PATH, dto).await?;
    Ok(created.data)
}

pub async fn update_location(
    client: &ApiClient,
    id: &str,
    dto: &LocationDto,
) -> Result<Location, ApiError> {
    let updated: ItemEnvelope<Location> = client.put_json(&location_path(id), dto).await?;
    Ok(updated.data)
}

pub async fn delete_location(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&location_path(id)).await
}
