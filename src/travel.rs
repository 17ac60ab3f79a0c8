//! Travel-time estimates for day plans.
//!
//! Forced travel is the drive between home and a stay on the first and last
//! day. Local travel is moving between visits on a day. Both consult the
//! injected provider when the config asks for it, fall back to straight-line
//! estimates when it cannot answer, and to fixed minutes without coordinates.

use crate::config::{LocalTravelPolicy, SchedulerConfig, TravelEstimate};
use crate::haversine::HaversineMatrix;
use crate::model::{DayType, Location, Poi, Point};
use crate::traits::{TravelMode, TravelTimeProvider};

fn seconds_to_minutes(seconds: i32) -> i32 {
    (f64::from(seconds) / 60.0).round() as i32
}

/// Minutes along consecutive points, asking the provider first.
fn path_minutes<P: TravelTimeProvider>(provider: &P, mode: TravelMode, points: &[Point]) -> i32 {
    if points.len() < 2 {
        return 0;
    }

    let mut matrix = provider.matrix_for(mode, points);
    let square = matrix.len() == points.len() && matrix.iter().all(|row| row.len() == points.len());
    if !square {
        tracing::debug!(?mode, points = points.len(), "Provider gave no usable matrix, using haversine");
        matrix = HaversineMatrix::default().matrix_for(mode, points);
    }

    let seconds: i32 = (1..points.len()).map(|i| matrix[i - 1][i]).sum();
    seconds_to_minutes(seconds)
}

/// Drive time between home and a stay.
pub fn forced_travel_minutes<P: TravelTimeProvider>(
    provider: &P,
    config: &SchedulerConfig,
    from: &Location,
    to: &Location,
) -> i32 {
    match config.travel_estimate {
        TravelEstimate::Baseline => config.travel_baseline_minutes,
        TravelEstimate::Routed => match (from.coordinates, to.coordinates) {
            (Some(a), Some(b)) => path_minutes(provider, TravelMode::Driving, &[a, b]),
            _ => {
                tracing::debug!(from = %from.label, to = %to.label, "Missing coordinates, using travel baseline");
                config.travel_baseline_minutes
            }
        },
    }
}

/// Time spent moving between the day's visits.
///
/// `base` is the stay the day's walk starts from and returns to.
pub fn local_travel_minutes<P: TravelTimeProvider>(
    provider: &P,
    config: &SchedulerConfig,
    day_type: DayType,
    base: Option<&Location>,
    pois: &[&Poi],
) -> i32 {
    if pois.is_empty() {
        return 0;
    }

    match config.local_travel {
        LocalTravelPolicy::Flat { minutes } => match day_type {
            DayType::Tour => minutes,
            DayType::Travel | DayType::Mixed => 0,
        },
        LocalTravelPolicy::RouteAware { unknown_leg_minutes } => {
            let base_point = base.and_then(|location| location.coordinates);
            let stops: Vec<Option<Point>> = std::iter::once(base_point)
                .chain(pois.iter().map(|poi| poi.coordinates))
                .chain(std::iter::once(base_point))
                .collect();

            // Runs of known points are routed together; a leg touching an
            // unknown point costs the flat per-leg minutes.
            let mut minutes = 0;
            let mut run: Vec<Point> = Vec::new();
            for (index, stop) in stops.iter().enumerate() {
                match stop {
                    Some(point) => run.push(*point),
                    None => {
                        minutes += path_minutes(provider, TravelMode::Walking, &run);
                        run.clear();
                        let legs_touching = usize::from(index > 0) + usize::from(index + 1 < stops.len());
                        minutes += unknown_leg_minutes * legs_touching as i32;
                    }
                }
            }
            minutes += path_minutes(provider, TravelMode::Walking, &run);

            // Two adjacent unknown stops share a leg counted twice above.
            let shared = stops.windows(2).filter(|pair| pair[0].is_none() && pair[1].is_none()).count();
            minutes - unknown_leg_minutes * shared as i32
        }
    }
}
