//! Scheduler tuning parameters.
//!
//! Every constant the scheduling stages use lives here so tests can tighten
//! them. Hosts may load them from TOML; absent keys keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};

/// How the forced home ↔ stay drive on the first and last day is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelEstimate {
    /// Always `travel_baseline_minutes`.
    #[default]
    Baseline,
    /// Ask the travel-time provider; fall back to the baseline without coordinates.
    Routed,
}

/// How time spent moving between visits on the same day is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LocalTravelPolicy {
    /// A flat allowance on tour days that have visits.
    Flat { minutes: i32 },
    /// Sum of walking legs stay → visits → stay.
    RouteAware { unknown_leg_minutes: i32 },
}

impl Default for LocalTravelPolicy {
    fn default() -> Self {
        LocalTravelPolicy::Flat { minutes: 60 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Soft ceiling on visit hours per day.
    pub day_capacity_hours: f64,
    /// Main POIs closer than this are clustered together.
    pub cluster_radius_km: f64,
    /// Groups at least this long get a day of their own.
    pub full_day_threshold_hours: f64,
    /// First/last day still hosts visits if its forced travel fits under this.
    pub max_travel_minutes_for_activities: i32,
    /// Forced travel time assumed when nothing better is known.
    pub travel_baseline_minutes: i32,
    pub travel_estimate: TravelEstimate,
    pub local_travel: LocalTravelPolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_capacity_hours: 8.0,
            cluster_radius_km: 20.0,
            full_day_threshold_hours: 6.0,
            max_travel_minutes_for_activities: 240,
            travel_baseline_minutes: 180,
            travel_estimate: TravelEstimate::default(),
            local_travel: LocalTravelPolicy::default(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SchedulerConfig = toml::from_str(content)
            .map_err(|e| SchedulerError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SchedulerError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.day_capacity_hours.is_finite() && self.day_capacity_hours > 0.0) {
            return Err(SchedulerError::Config(format!(
                "day_capacity_hours must be positive, got {}",
                self.day_capacity_hours
            )));
        }
        if !(self.cluster_radius_km.is_finite() && self.cluster_radius_km >= 0.0) {
            return Err(SchedulerError::Config(format!(
                "cluster_radius_km must not be negative, got {}",
                self.cluster_radius_km
            )));
        }
        if !self.full_day_threshold_hours.is_finite() || self.full_day_threshold_hours <= 0.0 {
            return Err(SchedulerError::Config(format!(
                "full_day_threshold_hours must be positive, got {}",
                self.full_day_threshold_hours
            )));
        }
        if self.max_travel_minutes_for_activities < 0 || self.travel_baseline_minutes < 0 {
            return Err(SchedulerError::Config(
                "travel minutes must not be negative".to_string(),
            ));
        }
        let local_minutes = match self.local_travel {
            LocalTravelPolicy::Flat { minutes } => minutes,
            LocalTravelPolicy::RouteAware { unknown_leg_minutes } => unknown_leg_minutes,
        };
        if local_minutes < 0 {
            return Err(SchedulerError::Config(
                "local travel minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.day_capacity_hours, 8.0);
        assert_eq!(config.cluster_radius_km, 20.0);
        assert_eq!(config.full_day_threshold_hours, 6.0);
        assert_eq!(config.max_travel_minutes_for_activities, 240);
        assert_eq!(config.travel_baseline_minutes, 180);
        assert_eq!(config.travel_estimate, TravelEstimate::Baseline);
        assert_eq!(config.local_travel, LocalTravelPolicy::Flat { minutes: 60 });
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SchedulerConfig::from_toml_str(
            r#"
            cluster_radius_km = 5.0
            travel_estimate = "routed"

            [local_travel]
            policy = "route_aware"
            unknown_leg_minutes = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.cluster_radius_km, 5.0);
        assert_eq!(config.day_capacity_hours, 8.0);
        assert_eq!(config.travel_estimate, TravelEstimate::Routed);
        assert_eq!(
            config.local_travel,
            LocalTravelPolicy::RouteAware {
                unknown_leg_minutes: 20
            }
        );
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = SchedulerConfig::from_toml_str("day_capacity_hours = 0.0").unwrap_err();
        assert!(matches!(err, SchedulerError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = SchedulerConfig::from_toml_str("day_capacity_hours = \"eight\"").unwrap_err();
        assert!(matches!(err, SchedulerError::Config(msg) if msg.starts_with("Failed to parse")));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_travel_minutes_for_activities = 120").unwrap();

        let config = SchedulerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_travel_minutes_for_activities, 120);
    }

    #[test]
    fn test_missing_file() {
        let err = SchedulerConfig::from_file("/nonexistent/scheduler.toml").unwrap_err();
        assert!(matches!(err, SchedulerError::Config(msg) if msg.contains("Failed to read")));
    }
}
