use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;
const MILES_PER_KM: f64 = 0.621371;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds a coordinate only when both components are stored.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }
}

/// Haversine great-circle distance in miles, rounded to one decimal place.
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + a.latitude.to_radians().cos() * b.latitude.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    let km = EARTH_RADIUS_KM * c;
    let miles = km * MILES_PER_KM;

    (miles * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_same_point_is_zero() {
        let p = Coordinate::new(41.8781, -87.6298);
        assert_eq!(distance_miles(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let chicago = Coordinate::new(41.8781, -87.6298);
        let new_york = Coordinate::new(40.7128, -74.0060);
        assert_eq!(
            distance_miles(chicago, new_york),
            distance_miles(new_york, chicago)
        );

        let a = Coordinate::new(-33.8688, 151.2093);
        let b = Coordinate::new(51.5074, -0.1278);
        assert_eq!(distance_miles(a, b), distance_miles(b, a));
    }

    #[test]
    fn test_distance_chicago_to_new_york() {
        let chicago = Coordinate::new(41.8781, -87.6298);
        let new_york = Coordinate::new(40.7128, -74.0060);
        let dist = distance_miles(chicago, new_york);
        assert!(
            (dist - 711.2).abs() <= 1.0,
            "expected ~711.2 miles, got {}",
            dist
        );
    }

    #[test]
    fn test_distance_rounds_to_one_decimal() {
        let a = Coordinate::new(41.8781, -87.6298);
        let b = Coordinate::new(41.9000, -87.6500);
        let dist = distance_miles(a, b);
        assert_eq!(dist, (dist * 10.0).round() / 10.0);
    }

    #[test]
    fn test_from_parts_requires_both_components() {
        assert!(Coordinate::from_parts(Some(41.88), Some(-87.63)).is_some());
        assert!(Coordinate::from_parts(Some(41.88), None).is_none());
        assert!(Coordinate::from_parts(None, Some(-87.63)).is_none());
        assert!(Coordinate::from_parts(None, None).is_none());
    }
}
