use contracts::domain::a004_location::aggregate::{Location, LocationDto};
use contracts::shared::{ActionResult, ValidationErrors};
use leptos::prelude::*;

use crate::domain::a004_location::api::{create_location, update_location};
use crate::domain::a004_location::store::LocationStore;
use crate::shared::http::ApiClient;

/// Raw form input; coordinates stay text until submit
#[derive(Debug, Clone, PartialEq)]
pub struct LocationForm {
    pub english_name: String,
    pub burmese_name: String,
    pub address: String,
    pub description: String,
    pub location_type: String,
    pub lat: String,
    pub lon: String,
}

impl Default for LocationForm {
    fn default() -> Self {
        Self::from_dto(&LocationDto::default())
    }
}

impl LocationForm {
    fn from_dto(dto: &LocationDto) -> Self {
        Self {
            english_name: dto.english_name.clone(),
            burmese_name: dto.burmese_name.clone(),
            address: dto.address.clone(),
            description: dto.description.clone(),
            location_type: dto.location_type.clone(),
            lat: dto.lat.to_string(),
            lon: dto.lon.to_string(),
        }
    }

    pub fn from_location(location: &Location) -> Self {
        Self::from_dto(&LocationDto::from(location))
    }

    /// Parse and validate; every failing field is reported at once
    pub fn to_dto(&self) -> Result<LocationDto, ValidationErrors> {
        let mut parse_errors = ValidationErrors::new();
        let lat = self.lat.trim().parse::<f64>().unwrap_or_else(|_| {
            parse_errors.add("lat", "Latitude must be a number");
            0.0
        });
        let lon = self.lon.trim().parse::<f64>().unwrap_or_else(|_| {
            parse_errors.add("lon", "Longitude must be a number");
            0.0
        });

        let dto = LocationDto {
            burmese_name: self.burmese_name.trim().to_string(),
            english_name: self.english_name.trim().to_string(),
            address: self.address.trim().to_string(),
            description: self.description.trim().to_string(),
            lon,
            lat,
            location_type: self.location_type.clone(),
        };

        let mut errors = dto.validate().err().unwrap_or_default();
        for (field, message) in parse_errors.iter() {
            errors.add(field, message);
        }
        errors.into_result().map(|_| dto)
    }
}

#[derive(Clone, Copy)]
pub struct LocationDetailsViewModel {
    pub id: StoredValue<Option<String>>,
    pub form: RwSignal<LocationForm>,
    pub field_errors: RwSignal<ValidationErrors>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
    loaded: RwSignal<bool>,
}

impl LocationDetailsViewModel {
    pub fn new(id: Option<String>) -> Self {
        let loaded = id.is_none();
        Self {
            id: StoredValue::new(id),
            form: RwSignal::new(LocationForm::default()),
            field_errors: RwSignal::new(ValidationErrors::new()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
            loaded: RwSignal::new(loaded),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.id.with_value(Option::is_some)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Fill the form from the cached record once it is available
    pub fn sync_from_store(&self, store: LocationStore) {
        if self.loaded.get_untracked() {
            return;
        }
        let Some(id) = self.id.get_value() else {
            return;
        };
        if let Some(location) = store.get(&id) {
            self.form.set(LocationForm::from_location(&location));
            self.loaded.set(true);
        }
    }

    pub fn field_error(&self, field: &'static str) -> Option<String> {
        self.field_errors.with(|e| e.get(field).map(str::to_string))
    }

    /// Validate, send, and put the server's copy into the cache
    pub async fn save(&self, client: ApiClient, store: LocationStore) -> ActionResult<Location> {
        let dto = match self.form.get_untracked().to_dto() {
            Ok(dto) => dto,
            Err(errors) => {
                let summary = errors.summary();
                self.field_errors.set(errors);
                return ActionResult::failed(summary);
            }
        };
        self.field_errors.set(ValidationErrors::new());
        self.error.set(None);
        self.saving.set(true);

        let result = match self.id.get_value() {
            Some(id) => update_location(&client, &id, &dto).await.map(|saved| {
                store.cache().update(&id, saved.clone());
                saved
            }),
            None => create_location(&client, &dto).await.map(|saved| {
                store.cache().add(saved.clone());
                saved
            }),
        };

        self.saving.set(false);
        if let Err(e) = &result {
            log::warn!("location save failed: {}", e);
            self.error.set(Some(e.to_string()));
        }
        result.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> LocationForm {
        LocationForm {
            english_name: " Maubin General Hospital ".into(),
            burmese_name: "မအူပင်ဆေးရုံကြီး".into(),
            address: "Hospital Road".into(),
            description: String::new(),
            location_type: "hospital".into(),
            lat: "16.7312".into(),
            lon: "95.6521".into(),
        }
    }

    #[test]
    fn test_form_to_dto_trims_and_parses() {
        let dto = filled().to_dto().unwrap();
        assert_eq!(dto.english_name, "Maubin General Hospital");
        assert_eq!(dto.lat, 16.7312);
        assert_eq!(dto.lon, 95.6521);
    }

    #[test]
    fn test_unparsable_coordinates_reported_with_other_errors() {
        let mut form = filled();
        form.lat = "north".into();
        form.address = "  ".into();
        let errors = form.to_dto().unwrap_err();
        assert_eq!(errors.get("lat"), Some("Latitude must be a number"));
        assert_eq!(errors.get("address"), Some("Address is required"));
    }

    #[test]
    fn test_out_of_range_longitude() {
        let mut form = filled();
        form.lon = "181".into();
        let errors = form.to_dto().unwrap_err();
        assert_eq!(errors.get("lon"), Some("Longitude must be between -180 and 180"));
    }

    #[test]
    fn test_form_from_existing_location() {
        let location = Location::from_dto("loc-1", &filled().to_dto().unwrap());
        let form = LocationForm::from_location(&location);
        assert_eq!(form.lat, "16.7312");
        assert_eq!(form.location_type, "hospital");
    }
}
