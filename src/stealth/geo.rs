use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// A plausible browser geolocation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLocation {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy in meters
    pub accuracy: f64,
}

/// (city, latitude, longitude)
pub const CITIES: &[(&str, f64, f64)] = &[
    ("New York", 40.7128, -74.0060),
    ("London", 51.5074, -0.1278),
    ("Tokyo", 35.6762, 139.6503),
    ("Sydney", -33.8688, 151.2093),
    ("Paris", 48.8566, 2.3522),
    ("Berlin", 52.5200, 13.4050),
    ("Toronto", 43.6532, -79.3832),
    ("Singapore", 1.3521, 103.8198),
];

const MIN_ACCURACY: f64 = 10.0;
const MAX_ACCURACY: f64 = 100.0;

impl GeoLocation {
    /// Picks a city uniformly and an accuracy in [10, 100] meters
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let (city, latitude, longitude) = *CITIES.choose(&mut rng).unwrap_or(&CITIES[0]);
        Self {
            city: city.to_string(),
            latitude,
            longitude,
            accuracy: rng.gen_range(MIN_ACCURACY..=MAX_ACCURACY),
        }
    }
}
