//! Collaborator seams of the scheduler.
//!
//! The scheduling core never talks to the network. Hosts that have a routing
//! service or a geocoder plug them in through these traits; everything has an
//! offline fallback.

use crate::model::{Point, TripRequest};

/// Mode of transport a travel-time lookup is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelMode {
    /// Home ↔ stay drives on the first and last day.
    Driving,
    /// Legs between visits on the same day.
    Walking,
}

/// Provides a travel-time matrix (seconds) for a set of points.
///
/// The matrix is indexed by the provided point order. An empty matrix means
/// the provider could not answer and the caller should fall back.
pub trait TravelTimeProvider {
    fn matrix_for(&self, mode: TravelMode, points: &[Point]) -> Vec<Vec<i32>>;
}

impl<T: TravelTimeProvider + ?Sized> TravelTimeProvider for &T {
    fn matrix_for(&self, mode: TravelMode, points: &[Point]) -> Vec<Vec<i32>> {
        (**self).matrix_for(mode, points)
    }
}

/// Resolves a free-text place label to coordinates.
pub trait Geocoder {
    fn resolve(&self, label: &str) -> Option<Point>;
}

/// Fills in coordinates the host has not resolved yet.
///
/// Locations that already carry coordinates are left alone; labels the
/// geocoder cannot resolve stay `None`, which the scheduler tolerates.
/// Returns how many coordinates were filled in.
pub fn resolve_missing_coordinates<G: Geocoder>(request: &mut TripRequest, geocoder: &G) -> usize {
    let mut resolved = 0;

    let locations = std::iter::once(&mut request.home_location)
        .chain(request.overnight_stays.iter_mut().map(|stay| &mut stay.location));
    for location in locations {
        if location.coordinates.is_none() {
            location.coordinates = geocoder.resolve(&location.label);
            resolved += usize::from(location.coordinates.is_some());
        }
    }

    for poi in request.pois.iter_mut() {
        if poi.coordinates.is_none() {
            poi.coordinates = geocoder.resolve(&poi.name);
            resolved += usize::from(poi.coordinates.is_some());
        }
    }

    tracing::debug!(resolved, "Geocoded missing coordinates");
    resolved
}
