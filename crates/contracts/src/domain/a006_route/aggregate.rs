use crate::shared::geo::LngLat;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

/// Body of `POST /routes`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    pub end_lat: f64,
    pub end_lon: f64,
}

impl RouteRequest {
    pub fn between(start: LngLat, end: LngLat) -> Self {
        Self {
            start_lat: start[1],
            start_lon: start[0],
            end_lat: end[1],
            end_lon: end[0],
        }
    }
}

// ============================================================================
// Result
// ============================================================================

/// Stop along a computed route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepLocation {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub burmese_name: String,
    #[serde(default)]
    pub english_name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type", default)]
    pub location_type: String,
}

impl StepLocation {
    pub fn position(&self) -> LngLat {
        [self.longitude, self.latitude]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadName {
    pub burmese_name: String,
    pub english_name: String,
    /// Human readable, e.g. `"300.0 meters"`.
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub road_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    #[serde(default)]
    pub coordinates: Vec<LngLat>,
    #[serde(rename = "type", default)]
    pub geometry_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteFeature {
    pub geometry: RouteGeometry,
    #[serde(rename = "type", default)]
    pub feature_type: String,
}

/// Response of `POST /routes` and `GET /history/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    #[serde(default)]
    pub route_id: String,
    #[serde(default)]
    pub is_success: bool,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub estimated_time: f64,
    pub route: RouteFeature,
    pub start_location: StepLocation,
    pub end_location: StepLocation,
    #[serde(default)]
    pub road_names: Vec<RoadName>,
    #[serde(default)]
    pub step_locations: Vec<StepLocation>,
}

impl RouteResult {
    pub fn coordinates(&self) -> &[LngLat] {
        &self.route.geometry.coordinates
    }
}

/// `1.2 km` from 1000 m upwards, otherwise whole meters.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round() as i64)
    }
}

/// Whole minutes, `1 min` / `3 mins`.
pub fn format_duration(seconds: f64) -> String {
    let minutes = (seconds / 60.0).floor().max(0.0) as i64;
    format!("{} min{}", minutes, if minutes != 1 { "s" } else { "" })
}
