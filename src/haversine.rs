//! Haversine distance and travel-time provider (fallback when OSRM unavailable).
//!
//! Uses great-circle distance stretched by a detour factor to estimate travel
//! time. Less accurate than OSRM (ignores roads and paths) but always available.

use crate::model::Point;
use crate::traits::{TravelMode, TravelTimeProvider};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

const DEFAULT_DRIVING_SPEED_KMH: f64 = 60.0;
const DEFAULT_WALKING_SPEED_KMH: f64 = 5.0;

/// Roads are not straight lines.
const DRIVING_DETOUR_FACTOR: f64 = 1.3;
const WALKING_DETOUR_FACTOR: f64 = 1.2;

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Point, to: Point) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Distance between two optional points; unknown coordinates are infinitely far.
pub fn distance_km(from: Option<Point>, to: Option<Point>) -> f64 {
    match (from, to) {
        (Some(from), Some(to)) => haversine_km(from, to),
        _ => f64::INFINITY,
    }
}

/// Haversine-based travel-time provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub driving_speed_kmh: f64,
    /// Assumed average walking speed in km/h.
    pub walking_speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            driving_speed_kmh: DEFAULT_DRIVING_SPEED_KMH,
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(driving_speed_kmh: f64, walking_speed_kmh: f64) -> Self {
        Self {
            driving_speed_kmh,
            walking_speed_kmh,
        }
    }

    /// Convert straight-line km to travel seconds for the given mode.
    fn km_to_seconds(&self, mode: TravelMode, km: f64) -> i32 {
        let (speed, detour) = match mode {
            TravelMode::Driving => (self.driving_speed_kmh, DRIVING_DETOUR_FACTOR),
            TravelMode::Walking => (self.walking_speed_kmh, WALKING_DETOUR_FACTOR),
        };
        let hours = km * detour / speed;
        (hours * 3600.0).round() as i32
    }
}

impl TravelTimeProvider for HaversineMatrix {
    fn matrix_for(&self, mode: TravelMode, points: &[Point]) -> Vec<Vec<i32>> {
        let n = points.len();
        let mut matrix = vec![vec![0; n]; n];

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.km_to_seconds(mode, haversine_km(*from, *to));
                }
            }
        }

        matrix
    }
}
