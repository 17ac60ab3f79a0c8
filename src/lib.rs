//! trip-scheduler core
//!
//! Turns a trip window, overnight stays, and a list of points of interest
//! into a day-by-day itinerary. Travel times come from a pluggable
//! provider: straight-line estimates offline, OSRM when a server is around.

pub mod budget;
pub mod config;
pub mod error;
pub mod grouping;
pub mod haversine;
pub mod model;
pub mod ordering;
pub mod osrm;
pub mod packing;
pub mod scheduler;
pub mod traits;
pub mod travel;

pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};
pub use model::{DayPlan, DayType, ItinerarySummary, Poi, TripRequest};
pub use scheduler::{Scheduler, generate_itinerary};
