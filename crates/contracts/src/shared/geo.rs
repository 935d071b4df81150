use serde::{Deserialize, Serialize};

/// `[longitude, latitude]`, the order used by GeoJSON and the map SDK.
pub type LngLat = [f64; 2];

const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Axis-aligned bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    pub fn from_point(point: LngLat) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    pub fn extend(&mut self, point: LngLat) {
        self.south_west[0] = self.south_west[0].min(point[0]);
        self.south_west[1] = self.south_west[1].min(point[1]);
        self.north_east[0] = self.north_east[0].max(point[0]);
        self.north_east[1] = self.north_east[1].max(point[1]);
    }

    /// `None` for an empty slice.
    pub fn from_points(points: &[LngLat]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_point(*first);
        for point in rest {
            bounds.extend(*point);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: LngLat) -> bool {
        point[0] >= self.south_west[0]
            && point[0] <= self.north_east[0]
            && point[1] >= self.south_west[1]
            && point[1] <= self.north_east[1]
    }
}

/// Great-circle distance in meters.
pub fn haversine_m(a: LngLat, b: LngLat) -> f64 {
    let (lon1, lat1) = (a[0].to_radians(), a[1].to_radians());
    let (lon2, lat2) = (b[0].to_radians(), b[1].to_radians());
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Length of each consecutive segment of a polyline.
pub fn segment_lengths_m(points: &[LngLat]) -> Vec<f64> {
    points.windows(2).map(|w| haversine_m(w[0], w[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points(&[[95.64, 16.73], [95.65, 16.72], [95.63, 16.74]]).unwrap();
        assert_eq!(bounds.south_west, [95.63, 16.72]);
        assert_eq!(bounds.north_east, [95.65, 16.74]);
        assert!(bounds.contains([95.64, 16.73]));
        assert!(!bounds.contains([95.70, 16.73]));
        assert!(Bounds::from_points(&[]).is_none());
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_m([0.0, 0.0], [0.0, 1.0]);
        assert!((d - 111_195.0).abs() < 50.0, "got {d}");
        assert_eq!(segment_lengths_m(&[[0.0, 0.0]]).len(), 0);
    }
}
