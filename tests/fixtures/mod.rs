//! Test fixtures for trip-scheduler.
//!
//! Provides realistic test data including:
//! - Real Tuscany locations (from OpenStreetMap)
//! - A trip builder with sensible defaults

#![allow(dead_code)]

pub mod tuscany_locations;

pub use tuscany_locations::*;

use trip_scheduler::model::{DurationClass, Location, OvernightStay, Poi, TripRequest};

impl Place {
    pub fn location(&self) -> Location {
        Location::new(self.name).at(self.lat, self.lng)
    }

    pub fn main_poi(&self, id: &str) -> Poi {
        Poi::main(id, self.name).at(self.lat, self.lng)
    }

    pub fn secondary_poi(&self, id: &str, main_name: &str) -> Poi {
        Poi::secondary(id, self.name, main_name)
            .at(self.lat, self.lng)
            .with_duration(DurationClass::Quick)
    }
}

/// Builder for trip requests: Milan home, one Florence hotel, no POIs.
#[derive(Clone, Debug)]
pub struct TestTrip {
    start: String,
    end: String,
    stays: Vec<OvernightStay>,
    pois: Vec<Poi>,
    first_travel: Option<i32>,
    last_travel: Option<i32>,
}

impl TestTrip {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
            stays: vec![OvernightStay::new("stay-1", HOTELS[0].location())],
            pois: Vec::new(),
            first_travel: None,
            last_travel: None,
        }
    }

    pub fn stays(mut self, places: &[Place]) -> Self {
        self.stays = places
            .iter()
            .enumerate()
            .map(|(i, place)| OvernightStay::new(format!("stay-{}", i + 1), place.location()))
            .collect();
        self
    }

    pub fn poi(mut self, poi: Poi) -> Self {
        self.pois.push(poi);
        self
    }

    pub fn first_travel(mut self, minutes: i32) -> Self {
        self.first_travel = Some(minutes);
        self
    }

    pub fn last_travel(mut self, minutes: i32) -> Self {
        self.last_travel = Some(minutes);
        self
    }

    pub fn build(self) -> TripRequest {
        let mut request = TripRequest::new(self.start, self.end, MILAN.location(), self.stays, self.pois);
        request.first_day_travel_minutes = self.first_travel;
        request.last_day_travel_minutes = self.last_travel;
        request
    }
}
