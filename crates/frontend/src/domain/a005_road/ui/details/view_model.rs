use contracts::domain::a004_location::aggregate::Location;
use contracts::domain::a005_road::aggregate::{Road, RoadDto};
use contracts::shared::geo::segment_lengths_m;
use contracts::shared::{ActionResult, LngLat, ValidationErrors};
use leptos::prelude::*;

use crate::domain::a005_road::api::create_road;
use crate::domain::a005_road::store::RoadStore;
use crate::shared::http::ApiClient;

/// A chosen point, remembered by the location it came from
#[derive(Debug, Clone, PartialEq)]
pub struct RoadPoint {
    pub location_id: String,
    pub name: String,
    pub position: LngLat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadForm {
    pub english_name: String,
    pub burmese_name: String,
    pub road_type: String,
    pub is_oneway: bool,
    /// Blank means "measure the polyline"
    pub length: String,
    pub points: Vec<RoadPoint>,
}

impl Default for RoadForm {
    fn default() -> Self {
        let dto = RoadDto::default();
        Self {
            english_name: dto.english_name,
            burmese_name: dto.burmese_name,
            road_type: dto.road_type,
            is_oneway: dto.is_oneway,
            length: String::new(),
            points: Vec::new(),
        }
    }
}

impl RoadForm {
    /// Append `location`; a location already on the road is refused
    pub fn add_point(&mut self, location: &Location) -> bool {
        if self.points.iter().any(|p| p.location_id == location.id) {
            return false;
        }
        self.points.push(RoadPoint {
            location_id: location.id.clone(),
            name: location.english_name.clone(),
            position: location.position(),
        });
        true
    }

    pub fn remove_point(&mut self, index: usize) {
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    pub fn coordinates(&self) -> Vec<LngLat> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Entered length as a single segment, or measured segment lengths
    fn lengths(&self, errors: &mut ValidationErrors) -> Vec<f64> {
        let entered = self.length.trim();
        if entered.is_empty() {
            return segment_lengths_m(&self.coordinates());
        }
        match entered.parse::<f64>() {
            Ok(value) => vec![value],
            Err(_) => {
                errors.add("length_m", "Length must be a number");
                Vec::new()
            }
        }
    }

    pub fn to_dto(&self) -> Result<RoadDto, ValidationErrors> {
        let mut parse_errors = ValidationErrors::new();
        let length_m = self.lengths(&mut parse_errors);
        let dto = RoadDto {
            burmese_name: self.burmese_name.trim().to_string(),
            english_name: self.english_name.trim().to_string(),
            coordinates: self.coordinates(),
            length_m,
            road_type: self.road_type.clone(),
            is_oneway: self.is_oneway,
        };

        let mut errors = dto.validate().err().unwrap_or_default();
        for (field, message) in parse_errors.iter() {
            errors.add(field, message);
        }
        errors.into_result().map(|_| dto)
    }
}

#[derive(Clone, Copy)]
pub struct RoadDetailsViewModel {
    pub form: RwSignal<RoadForm>,
    pub field_errors: RwSignal<ValidationErrors>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl RoadDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(RoadForm::default()),
            field_errors: RwSignal::new(ValidationErrors::new()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn field_error(&self, field: &'static str) -> Option<String> {
        self.field_errors.with(|e| e.get(field).map(str::to_string))
    }

    pub fn add_point(&self, location: &Location) {
        let mut added = false;
        self.form.update(|f| added = f.add_point(location));
        if !added {
            self.error
                .set(Some(format!("{} is already on this road", location.english_name)));
        }
    }

    pub async fn save(&self, client: ApiClient, store: RoadStore) -> ActionResult<Road> {
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

        let result = create_road(&client, &dto).await;
        self.saving.set(false);
        match &result {
            Ok(road) => store.cache().add(road.clone()),
            Err(e) => {
                log::warn!("road create failed: {}", e);
                self.error.set(Some(e.to_string()));
            }
        }
        result.into()
    }
}

impl Default for RoadDetailsViewModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::geo::haversine_m;

    fn location(id: &str, lon: f64, lat: f64) -> Location {
        Location {
            id: id.to_string(),
            english_name: format!("Stop {}", id),
            burmese_name: String::new(),
            address: String::new(),
            description: None,
            lat,
            lon,
            location_type: "defined_location".to_string(),
        }
    }

    fn named() -> RoadForm {
        RoadForm {
            english_name: "Pagoda Road".into(),
            burmese_name: "ဘုရားလမ်း".into(),
            ..RoadForm::default()
        }
    }

    #[test]
    fn test_duplicate_points_refused() {
        let mut form = named();
        assert!(form.add_point(&location("a", 95.64, 16.73)));
        assert!(form.add_point(&location("b", 95.65, 16.74)));
        assert!(!form.add_point(&location("a", 95.64, 16.73)));
        assert_eq!(form.points.len(), 2);

        form.remove_point(0);
        form.remove_point(5);
        assert_eq!(form.coordinates(), vec![[95.65, 16.74]]);
    }

    #[test]
    fn test_blank_length_uses_measured_segments() {
        let mut form = named();
        let a = location("a", 95.64, 16.73);
        let b = location("b", 95.65, 16.74);
        form.add_point(&a);
        form.add_point(&b);

        let dto = form.to_dto().unwrap();
        assert_eq!(dto.length_m.len(), 1);
        assert!((dto.length_m[0] - haversine_m(a.position(), b.position())).abs() < 1e-9);

        form.length = "1500".into();
        assert_eq!(form.to_dto().unwrap().length_m, vec![1500.0]);
    }

    #[test]
    fn test_single_point_and_bad_length_rejected() {
        let mut form = named();
        form.add_point(&location("a", 95.64, 16.73));
        form.length = "long".into();
        let errors = form.to_dto().unwrap_err();
        assert!(errors.get("coordinates").is_some());
        assert_eq!(errors.get("length_m"), Some("Length must be a number"));
    }
}
