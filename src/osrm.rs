//! OSRM HTTP adapter for travel-time matrices.

use serde::Deserialize;

use crate::model::Point;
use crate::traits::{TravelMode, TravelTimeProvider};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub driving_profile: String,
    pub walking_profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            driving_profile: "car".to_string(),
            walking_profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    fn profile(&self, mode: TravelMode) -> &str {
        match mode {
            TravelMode::Driving => &self.driving_profile,
            TravelMode::Walking => &self.walking_profile,
        }
    }

    fn table_url(&self, mode: TravelMode, points: &[Point]) -> String {
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.base_url.trim_end_matches('/'),
            self.profile(mode),
            coords
        )
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl TravelTimeProvider for OsrmClient {
    fn matrix_for(&self, mode: TravelMode, points: &[Point]) -> Vec<Vec<i32>> {
        if points.is_empty() {
            return Vec::new();
        }

        let url = self.config.table_url(mode, points);
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>());

        match response {
            Ok(body) => body.into_matrix(points.len()),
            Err(err) => {
                tracing::warn!(error = %err, ?mode, "OSRM table request failed");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    /// Rounded seconds, or empty if the table is incomplete or has unroutable pairs.
    fn into_matrix(self, expected: usize) -> Vec<Vec<i32>> {
        let rows = self.durations.unwrap_or_default();
        if rows.len() != expected || rows.iter().any(|row| row.len() != expected) {
            return Vec::new();
        }

        let matrix: Option<Vec<Vec<i32>>> = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|value| value.map(|secs| secs.round() as i32))
                    .collect()
            })
            .collect();
        matrix.unwrap_or_default()
    }
}
