//! Trip planner data model.
//!
//! Inputs (`TripRequest`, `Poi`, `Location`, `OvernightStay`) and outputs
//! (`DayPlan`, `ItinerarySummary`) are plain serde types whose JSON shape
//! matches what the planner UI persists and exports.

use chrono::{DateTime, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A labelled place. Coordinates are absent until the host has geocoded it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub label: String,
    #[serde(default)]
    pub coordinates: Option<Point>,
}

impl Location {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            coordinates: None,
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Point::new(latitude, longitude));
        self
    }
}

/// A place to sleep, used cyclically across the middle days of the trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvernightStay {
    pub id: String,
    #[serde(flatten)]
    pub location: Location,
}

impl OvernightStay {
    pub fn new(id: impl Into<String>, location: Location) -> Self {
        Self {
            id: id.into(),
            location,
        }
    }
}

/// How long a visit takes. Every stage reads minutes and hours from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DurationClass {
    Quick,
    #[default]
    HalfDay,
    FullDay,
}

impl DurationClass {
    pub const fn minutes(self) -> i32 {
        match self {
            DurationClass::Quick => 90,
            DurationClass::HalfDay => 210,
            DurationClass::FullDay => 420,
        }
    }

    pub fn hours(self) -> f64 {
        f64::from(self.minutes()) / 60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PoiKind {
    #[default]
    Main,
    Secondary,
}

fn default_category() -> String {
    "General".to_string()
}

/// A point of interest the traveller wants to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    pub id: String,
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default, rename = "duration")]
    pub duration_class: DurationClass,
    #[serde(default)]
    pub coordinates: Option<Point>,
    #[serde(default)]
    pub kind: PoiKind,
    /// Name of the main POI a secondary POI belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_main_name: Option<String>,
    /// 1-based day of the trip chosen by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_day: Option<i32>,
}

impl Poi {
    pub fn main(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: default_category(),
            duration_class: DurationClass::default(),
            coordinates: None,
            kind: PoiKind::Main,
            related_main_name: None,
            pinned_day: None,
        }
    }

    pub fn secondary(
        id: impl Into<String>,
        name: impl Into<String>,
        related_main_name: impl Into<String>,
    ) -> Self {
        Self {
            kind: PoiKind::Secondary,
            related_main_name: Some(related_main_name.into()),
            ..Self::main(id, name)
        }
    }

    pub fn with_duration(mut self, duration_class: DurationClass) -> Self {
        self.duration_class = duration_class;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinates = Some(Point::new(latitude, longitude));
        self
    }

    pub fn pinned_to(mut self, day: i32) -> Self {
        self.pinned_day = Some(day);
        self
    }

    /// The main POI name this POI hangs off, if it is a secondary.
    pub fn main_name(&self) -> Option<&str> {
        match self.kind {
            PoiKind::Main => None,
            PoiKind::Secondary => self.related_main_name.as_deref(),
        }
    }

    pub fn activity_minutes(&self) -> i32 {
        self.duration_class.minutes()
    }

    pub fn activity_hours(&self) -> f64 {
        self.duration_class.hours()
    }
}

/// Everything the host hands over when the user asks for an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub start_date: String,
    pub end_date: String,
    pub home_location: Location,
    pub overnight_stays: Vec<OvernightStay>,
    #[serde(default)]
    pub pois: Vec<Poi>,
    /// Known drive time home → first stay, overriding any estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_day_travel_minutes: Option<i32>,
    /// Known drive time last stay → home, overriding any estimate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day_travel_minutes: Option<i32>,
}

impl TripRequest {
    pub fn new(
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        home_location: Location,
        overnight_stays: Vec<OvernightStay>,
        pois: Vec<Poi>,
    ) -> Self {
        Self {
            start_date: start_date.into(),
            end_date: end_date.into(),
            home_location,
            overnight_stays,
            pois,
            first_day_travel_minutes: None,
            last_day_travel_minutes: None,
        }
    }

    /// Checks the preconditions the UI enforces before generation.
    pub fn check_preconditions(&self) -> Result<()> {
        if self.overnight_stays.is_empty() {
            return Err(SchedulerError::NoOvernightStays);
        }
        if self.home_location.label.trim().is_empty() {
            return Err(SchedulerError::MissingHomeLocation);
        }
        Ok(())
    }

    pub fn window(&self) -> Result<TripWindow> {
        let start = parse_date("startDate", &self.start_date)?;
        let end = parse_date("endDate", &self.end_date)?;
        TripWindow::new(start, end)
    }
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    trimmed
        .parse::<NaiveDate>()
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed).map(|dt| dt.date_naive()))
        .map_err(|_| SchedulerError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// Inclusive calendar range of the trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TripWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(SchedulerError::InvalidTripWindow(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days, counting both endpoints.
    pub fn total_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Date of the 0-based trip day.
    pub fn date_of(&self, day_index: usize) -> NaiveDate {
        self.start + Duration::days(day_index as i64)
    }
}

/// What a day is mostly about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    /// Forced travel between home and a stay, nothing else.
    Travel,
    /// Forced travel plus visits.
    Mixed,
    /// A day spent around the overnight stay.
    Tour,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub from: Location,
    pub to: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelKind {
    Departure,
    Return,
    None,
}

/// Minutes spent per activity kind; the parts add up to the day estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub travel: i32,
    pub activities: i32,
    pub local_travel: i32,
    pub travel_kind: TravelKind,
}

impl TimingBreakdown {
    pub fn total(&self) -> i32 {
        self.travel + self.activities + self.local_travel
    }
}

/// One calendar day of the itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day of the trip.
    pub day_number: usize,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub day_type: DayType,
    pub title: String,
    pub description: String,
    pub overnight_stay: Option<OvernightStay>,
    pub route: Option<Route>,
    pub pois: Vec<Poi>,
    pub estimated_duration_minutes: i32,
    pub timing: TimingBreakdown,
}

impl DayPlan {
    pub fn activity_hours(&self) -> f64 {
        self.pois.iter().map(Poi::activity_hours).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItinerarySummary {
    pub total_days: usize,
    pub total_pois: usize,
    pub total_minutes: i32,
    /// 1-based days whose visits exceed the daily capacity.
    pub overflow_days: Vec<usize>,
}

impl ItinerarySummary {
    pub fn from_days(days: &[DayPlan], day_capacity_hours: f64) -> Self {
        Self {
            total_days: days.len(),
            total_pois: days.iter().map(|day| day.pois.len()).sum(),
            total_minutes: days.iter().map(|day| day.estimated_duration_minutes).sum(),
            overflow_days: days
                .iter()
                .filter(|day| day.activity_hours() > day_capacity_hours)
                .map(|day| day.day_number)
                .collect(),
        }
    }
}
