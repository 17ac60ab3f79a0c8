//! Error taxonomy for itinerary generation.
//!
//! Only structurally invalid input is fatal. Irregular POI or location data
//! (missing coordinates, orphaned secondaries, out-of-range pins, too little
//! capacity) is absorbed by the scheduler and never surfaces here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Invalid trip window: {0}")]
    InvalidTripWindow(String),

    #[error("Invalid {field}: {value:?} is not an ISO date")]
    InvalidDate { field: &'static str, value: String },

    #[error("At least one overnight stay is required")]
    NoOvernightStays,

    #[error("Home location label must not be empty")]
    MissingHomeLocation,

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
