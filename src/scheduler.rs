//! Itinerary generation.
//!
//! Runs the stages in order: day budget, grouping, pinned placement,
//! clustering and packing, per-day ordering, and finally assembles one
//! `DayPlan` per calendar day. Pure computation apart from whatever the
//! injected travel-time provider does.

use crate::budget::{DayBudget, is_feasible};
use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::grouping::group_pois;
use crate::haversine::HaversineMatrix;
use crate::model::{
    DayPlan, DayType, ItinerarySummary, Location, OvernightStay, Poi, Route, TimingBreakdown,
    TravelKind, TripRequest,
};
use crate::ordering::order_day;
use crate::packing::{DaySlot, PackingOptions, pack_groups};
use crate::traits::TravelTimeProvider;
use crate::travel::{forced_travel_minutes, local_travel_minutes};

/// Generates an itinerary with the default configuration and no network access.
pub fn generate_itinerary(request: &TripRequest) -> Result<Vec<DayPlan>> {
    Scheduler::offline().generate(request)
}

/// Clamps a 1-based pinned day into the trip and returns the 0-based index.
pub fn clamp_pinned_day(pinned_day: i32, total_days: usize) -> usize {
    let last = i32::try_from(total_days).unwrap_or(i32::MAX).max(1);
    (pinned_day.clamp(1, last) - 1) as usize
}

/// Itinerary scheduler over a travel-time provider.
#[derive(Debug, Clone)]
pub struct Scheduler<P: TravelTimeProvider> {
    provider: P,
    config: SchedulerConfig,
}

impl Scheduler<HaversineMatrix> {
    pub fn offline() -> Self {
        Self::new(HaversineMatrix::default())
    }
}

impl<P: TravelTimeProvider> Scheduler<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SchedulerConfig::default())
    }

    pub fn with_config(provider: P, config: SchedulerConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn summarize(&self, days: &[DayPlan]) -> ItinerarySummary {
        ItinerarySummary::from_days(days, self.config.day_capacity_hours)
    }

    /// Builds the full day-by-day itinerary for a trip.
    ///
    /// Fails only on an invalid configuration, a broken trip window, or
    /// missing caller preconditions; every POI in the request appears
    /// exactly once in the output.
    pub fn generate(&self, request: &TripRequest) -> Result<Vec<DayPlan>> {
        self.config.validate()?;
        request.check_preconditions()?;
        let window = request.window()?;

        let total_days = window.total_days();
        let stays = &request.overnight_stays;
        let home = &request.home_location;
        let first_stay = &stays[0];
        let last_stay = &stays[(total_days.max(2) as usize - 2) % stays.len()];

        let first_travel = request
            .first_day_travel_minutes
            .unwrap_or_else(|| forced_travel_minutes(&self.provider, &self.config, home, &first_stay.location));
        let last_travel = request
            .last_day_travel_minutes
            .unwrap_or_else(|| forced_travel_minutes(&self.provider, &self.config, &last_stay.location, home));

        let max_travel = self.config.max_travel_minutes_for_activities;
        let budget = DayBudget::for_window(
            &window,
            is_feasible(first_travel, max_travel),
            is_feasible(last_travel, max_travel),
        )?;
        tracing::debug!(
            total_days = budget.total_days,
            tour_days = budget.tour_days,
            first_travel,
            last_travel,
            "Computed day budget"
        );

        let travel_minutes: Vec<i32> = (0..budget.total_days)
            .map(|day| {
                let mut minutes = 0;
                if budget.is_first(day) {
                    minutes += first_travel;
                    if budget.total_days == 1 {
                        minutes += last_travel;
                    }
                }
                if budget.is_last(day) {
                    minutes += last_travel;
                }
                minutes
            })
            .collect();

        let capacity = self.config.day_capacity_hours;
        let mut calendar: Vec<DaySlot<'_>> = travel_minutes
            .iter()
            .enumerate()
            .map(|(day, &minutes)| {
                let mut slot = DaySlot::new(day, capacity);
                slot.reserve(f64::from(minutes) / 60.0);
                slot
            })
            .collect();

        let grouping = group_pois(&request.pois);

        for (pinned_day, groups) in grouping.pinned {
            let day = clamp_pinned_day(pinned_day, budget.total_days);
            if usize::try_from(pinned_day).ok() != Some(day + 1) {
                tracing::warn!(pinned_day, clamped_to = day + 1, "Pinned day outside trip, clamping");
            }
            for group in groups {
                calendar[day].assign(group);
            }
        }

        let mut packing_order = budget.activity_days();
        if packing_order.is_empty() && !grouping.unpinned.is_empty() {
            tracing::warn!(
                groups = grouping.unpinned.len(),
                "No day has room for visits, spreading them over travel days"
            );
            packing_order = (0..budget.total_days).collect();
        }

        let mut packing: Vec<DaySlot<'_>> = packing_order
            .iter()
            .map(|&day| std::mem::replace(&mut calendar[day], DaySlot::new(day, capacity)))
            .collect();
        let unplaced = pack_groups(grouping.unpinned, &mut packing, &PackingOptions::from(&self.config));
        for slot in packing {
            let day = slot.day_index;
            calendar[day] = slot;
        }
        if let Some(first) = calendar.first_mut() {
            for group in unplaced {
                first.assign(group);
            }
        }

        let days: Vec<DayPlan> = calendar
            .iter()
            .map(|slot| {
                let day = slot.day_index;
                let pois = order_day(&slot.groups);
                self.assemble_day(
                    &budget,
                    day,
                    window.date_of(day),
                    DayContext {
                        home,
                        stays,
                        last_stay,
                        travel_minutes: travel_minutes[day],
                    },
                    &pois,
                )
            })
            .collect();

        tracing::info!(
            days = days.len(),
            pois = request.pois.len(),
            tour_days = budget.tour_days,
            "Generated itinerary"
        );
        Ok(days)
    }

    fn assemble_day(
        &self,
        budget: &DayBudget,
        day: usize,
        date: chrono::NaiveDate,
        context: DayContext<'_>,
        pois: &[&Poi],
    ) -> DayPlan {
        let DayContext {
            home,
            stays,
            last_stay,
            travel_minutes,
        } = context;
        let has_pois = !pois.is_empty();

        let (day_type, travel_kind, overnight_stay, route, base) = if budget.is_first(day) {
            let first_stay = &stays[0];
            (
                if has_pois { DayType::Mixed } else { DayType::Travel },
                TravelKind::Departure,
                Some(first_stay.clone()),
                Some(Route {
                    from: home.clone(),
                    to: first_stay.location.clone(),
                }),
                &first_stay.location,
            )
        } else if budget.is_last(day) {
            (
                if has_pois { DayType::Mixed } else { DayType::Travel },
                TravelKind::Return,
                None,
                Some(Route {
                    from: last_stay.location.clone(),
                    to: home.clone(),
                }),
                &last_stay.location,
            )
        } else {
            let stay = &stays[(day - 1) % stays.len()];
            (DayType::Tour, TravelKind::None, Some(stay.clone()), None, &stay.location)
        };

        let (title, description) = describe(day, day_type, travel_kind);
        let activities: i32 = pois.iter().map(|poi| poi.activity_minutes()).sum();
        let local_travel = local_travel_minutes(&self.provider, &self.config, day_type, Some(base), pois);
        let timing = TimingBreakdown {
            travel: travel_minutes,
            activities,
            local_travel,
            travel_kind,
        };

        DayPlan {
            day_number: day + 1,
            date,
            day_type,
            title,
            description,
            overnight_stay,
            route,
            pois: pois.iter().map(|poi| (*poi).clone()).collect(),
            estimated_duration_minutes: timing.total(),
            timing,
        }
    }
}

/// Trip-wide facts every day plan needs.
#[derive(Clone, Copy)]
struct DayContext<'a> {
    home: &'a Location,
    stays: &'a [OvernightStay],
    last_stay: &'a OvernightStay,
    travel_minutes: i32,
}

fn describe(day: usize, day_type: DayType, travel_kind: TravelKind) -> (String, String) {
    let (title, description) = match (day_type, travel_kind) {
        (DayType::Tour, _) => (format!("Tour Day {}", day), "Explore local attractions"),
        (DayType::Travel, TravelKind::Return) => ("Travel Day - Return".to_string(), "Travel back home"),
        (DayType::Travel, _) => (
            "Travel Day - Departure".to_string(),
            "Travel from home to first destination",
        ),
        (DayType::Mixed, TravelKind::Return) => (
            "Final Activities & Return".to_string(),
            "Final sightseeing and travel back home",
        ),
        (DayType::Mixed, _) => (
            "Departure & First Activities".to_string(),
            "Travel to destination and explore local attractions",
        ),
    };
    (title, description.to_string())
}
