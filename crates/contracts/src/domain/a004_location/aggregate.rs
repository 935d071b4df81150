use crate::shared::geo::LngLat;
use crate::shared::validation::{require_non_empty, ValidationErrors};
use serde::{Deserialize, Serialize};

/// Location categories known to the map. Anything else is rendered with the
/// default pin.
pub const LOCATION_TYPES: &[&str] = &[
    "landmark",
    "restaurant",
    "hospital",
    "school",
    "market",
    "temple",
    "government",
    "defined_location",
];

// ============================================================================
// Aggregate
// ============================================================================

/// Named point on the map (admin reference data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub english_name: String,
    pub burmese_name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "type", default)]
    pub location_type: String,
}

impl Location {
    pub fn position(&self) -> LngLat {
        [self.lon, self.lat]
    }

    /// Two-line label used by map markers.
    pub fn display_name(&self) -> String {
        format!("{}\n{}", self.english_name, self.burmese_name)
    }

    /// Build the entity from a confirmed form and a server-issued id.
    pub fn from_dto(id: impl Into<String>, dto: &LocationDto) -> Self {
        Self {
            id: id.into(),
            english_name: dto.english_name.clone(),
            burmese_name: dto.burmese_name.clone(),
            address: dto.address.clone(),
            description: if dto.description.trim().is_empty() {
                None
            } else {
                Some(dto.description.clone())
            },
            lat: dto.lat,
            lon: dto.lon,
            location_type: dto.location_type.clone(),
        }
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Body of `POST /admin/locations` and `PUT /admin/locations/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    pub burmese_name: String,
    pub english_name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub lon: f64,
    pub lat: f64,
    #[serde(rename = "type")]
    pub location_type: String,
}

impl Default for LocationDto {
    fn default() -> Self {
        Self {
            burmese_name: String::new(),
            english_name: String::new(),
            address: String::new(),
            description: String::new(),
            lon: 0.0,
            lat: 0.0,
            location_type: "defined_location".to_string(),
        }
    }
}

impl From<&Location> for LocationDto {
    fn from(location: &Location) -> Self {
        Self {
            burmese_name: location.burmese_name.clone(),
            english_name: location.english_name.clone(),
            address: location.address.clone(),
            description: location.description.clone().unwrap_or_default(),
            lon: location.lon,
            lat: location.lat,
            location_type: location.location_type.clone(),
        }
    }
}

impl LocationDto {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require_non_empty(&mut errors, "burmese_name", &self.burmese_name, "Burmese name is required");
        require_non_empty(&mut errors, "english_name", &self.english_name, "English name is required");
        require_non_empty(&mut errors, "address", &self.address, "Address is required");
        if !LOCATION_TYPES.contains(&self.location_type.as_str()) {
            errors.add("type", "Unknown location type");
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            errors.add("lat", "Latitude must be between -90 and 90");
        }
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            errors.add("lon", "Longitude must be between -180 and 180");
        }
        errors.into_result()
    }
}
