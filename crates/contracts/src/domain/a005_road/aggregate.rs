use crate::shared::geo::LngLat;
use crate::shared::validation::{require_non_empty, ValidationErrors};
use serde::{Deserialize, Serialize};

pub const ROAD_TYPES: &[&str] = &["highway", "local", "residential", "service", "pedestrian"];

// ============================================================================
// Aggregate
// ============================================================================

/// Road segment chain (admin reference data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: String,
    pub english_name: String,
    pub burmese_name: String,
    #[serde(default)]
    pub coordinates: Vec<LngLat>,
    #[serde(default)]
    pub length_m: Vec<f64>,
    #[serde(default)]
    pub road_type: String,
    #[serde(default)]
    pub is_oneway: bool,
    /// GeoJSON LineString of `coordinates`, derived when the API omits it.
    #[serde(default)]
    pub geojson: Option<String>,
}

impl Road {
    pub fn total_length(&self) -> f64 {
        self.length_m.iter().sum()
    }

    /// Fill `geojson` from the coordinates when missing.
    pub fn ensure_geojson(&mut self) {
        if self.geojson.as_deref().map_or(true, str::is_empty) {
            self.geojson = Some(line_string_geojson(&self.coordinates));
        }
    }

    /// Replace the polyline; the derived geojson follows the new coordinates.
    pub fn set_coordinates(&mut self, coordinates: Vec<LngLat>) {
        self.geojson = Some(line_string_geojson(&coordinates));
        self.coordinates = coordinates;
    }

    pub fn from_dto(id: impl Into<String>, dto: &RoadDto) -> Self {
        let mut road = Self {
            id: id.into(),
            english_name: dto.english_name.clone(),
            burmese_name: dto.burmese_name.clone(),
            coordinates: dto.coordinates.clone(),
            length_m: dto.length_m.clone(),
            road_type: dto.road_type.clone(),
            is_oneway: dto.is_oneway,
            geojson: None,
        };
        road.ensure_geojson();
        road
    }
}

/// `{"type":"LineString","coordinates":[...]}`
pub fn line_string_geojson(coordinates: &[LngLat]) -> String {
    serde_json::json!({
        "type": "LineString",
        "coordinates": coordinates,
    })
    .to_string()
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of `POST /admin/roads`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadDto {
    pub burmese_name: String,
    pub english_name: String,
    pub coordinates: Vec<LngLat>,
    pub length_m: Vec<f64>,
    pub road_type: String,
    #[serde(default)]
    pub is_oneway: bool,
}

impl Default for RoadDto {
    fn default() -> Self {
        Self {
            burmese_name: String::new(),
            english_name: String::new(),
            coordinates: Vec::new(),
            length_m: Vec::new(),
            road_type: "local".to_string(),
            is_oneway: false,
        }
    }
}

impl RoadDto {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_empty(&mut errors, "burmese_name", &self.burmese_name, "Burmese name is required");
        require_non_empty(&mut errors, "english_name", &self.english_name, "English name is required");
        if !ROAD_TYPES.contains(&self.road_type.as_str()) {
            errors.add("road_type", "Road type is required");
        }
        if self.coordinates.len() < 2 {
            errors.add("coordinates", "At least two coordinate pairs are required");
        }
        if self.length_m.iter().any(|l| !l.is_finite() || *l < 0.0) {
            errors.add("length_m", "Length must be a positive number");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geojson_derived_when_missing() {
        let mut road: Road = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "english_name": "3rd Street",
            "burmese_name": "၃ လမ်း",
            "coordinates": [[95.64, 16.73], [95.65, 16.74]],
            "length_m": [300.0, 400.0],
            "road_type": "local"
        }))
        .unwrap();
        assert!(road.geojson.is_none());
        road.ensure_geojson();
        let geo: serde_json::Value = serde_json::from_str(road.geojson.as_deref().unwrap()).unwrap();
        assert_eq!(geo["type"], "LineString");
        assert_eq!(geo["coordinates"][1][0], 95.65);
        assert_eq!(road.total_length(), 700.0);
    }

    #[test]
    fn test_set_coordinates_regenerates_geojson() {
        let mut road = Road::from_dto("r2", &RoadDto {
            burmese_name: "မြို့ရှောင်လမ်း".into(),
            english_name: "Myo Shaung Road".into(),
            coordinates: vec![[0.0, 0.0], [1.0, 1.0]],
            length_m: vec![10.0],
            road_type: "highway".into(),
            is_oneway: true,
        });
        road.set_coordinates(vec![[2.0, 2.0], [3.0, 3.0]]);
        assert!(road.geojson.as_deref().unwrap().contains("[2.0,2.0]"));
    }

    #[test]
    fn test_dto_validation() {
        let dto = RoadDto {
            english_name: "Pagoda Road".into(),
            burmese_name: "ဘုရားလမ်း".into(),
            coordinates: vec![[0.0, 0.0]],
            length_m: vec![-1.0],
            road_type: "motorway".into(),
            ..RoadDto::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("coordinates").is_some());
        assert!(errors.get("length_m").is_some());
        assert!(errors.get("road_type").is_some());
        assert!(errors.get("english_name").is_none());
    }
}
