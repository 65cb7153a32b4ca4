//! Common types used across the panel service

use serde::{Deserialize, Serialize};

/// GPS coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Convert a possibly non-finite reading into an API-facing optional.
///
/// The core carries missing data as NaN so that lookups and statistics
/// stay total; JSON has no NaN, so the boundary maps it to `null`.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
