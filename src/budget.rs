//! Day-budget calculation.
//!
//! Decides which calendar days have spare capacity for visits. Middle days
//! always do; the first and last day only when their forced home ↔ stay
//! travel is short enough.

use crate::error::{Result, SchedulerError};
use crate::model::TripWindow;

/// Whether a day with this much forced travel can still host visits.
pub fn is_feasible(travel_minutes: i32, max_travel_minutes: i32) -> bool {
    travel_minutes <= max_travel_minutes
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBudget {
    pub total_days: usize,
    pub first_day_feasible: bool,
    pub last_day_feasible: bool,
    /// Number of days with capacity for visits.
    pub tour_days: usize,
}

impl DayBudget {
    pub fn calculate(total_days: i64, first_day_feasible: bool, last_day_feasible: bool) -> Result<Self> {
        if total_days < 1 {
            return Err(SchedulerError::InvalidTripWindow(format!(
                "trip must span at least one day, got {}",
                total_days
            )));
        }

        let tour_days = (total_days - 2 + i64::from(first_day_feasible) + i64::from(last_day_feasible)).max(0);

        Ok(Self {
            total_days: total_days as usize,
            first_day_feasible,
            last_day_feasible,
            tour_days: tour_days as usize,
        })
    }

    pub fn for_window(window: &TripWindow, first_day_feasible: bool, last_day_feasible: bool) -> Result<Self> {
        Self::calculate(window.total_days(), first_day_feasible, last_day_feasible)
    }

    pub fn is_first(&self, day_index: usize) -> bool {
        day_index == 0
    }

    /// Last day of a multi-day trip. A one-day trip only has a first day.
    pub fn is_last(&self, day_index: usize) -> bool {
        self.total_days > 1 && day_index == self.total_days - 1
    }

    /// Whether the 0-based day has capacity for unpinned visits.
    pub fn has_capacity(&self, day_index: usize) -> bool {
        if day_index >= self.total_days {
            return false;
        }
        if self.total_days == 1 {
            // Out and back on the same day.
            return self.first_day_feasible && self.last_day_feasible;
        }
        if self.is_first(day_index) {
            self.first_day_feasible
        } else if self.is_last(day_index) {
            self.last_day_feasible
        } else {
            true
        }
    }

    /// Days with capacity, in the order they should be filled: middle days
    /// first, then the first day, then the last day.
    pub fn activity_days(&self) -> Vec<usize> {
        let middle = (0..self.total_days).filter(|&day| !self.is_first(day) && !self.is_last(day));
        let ends = (0..self.total_days).filter(|&day| self.is_first(day) || self.is_last(day));

        middle
            .chain(ends)
            .filter(|&day| self.has_capacity(day))
            .collect()
    }
}
