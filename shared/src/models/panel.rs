//! Panel and hourly models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Alert;
use crate::types::GpsCoordinates;

/// Serving mode decided by the horizon classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Forecast,
    Climatology,
    History,
}

/// Wind summary for the panel
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Wind {
    pub speed_ms: Option<f64>,
    pub gust_ms: Option<f64>,
    pub direction_deg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compass: Option<String>,
}

/// Named 0-1 probability flags: the fraction of local-day hours
/// meeting each category's predicate, rounded to 2 decimals
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ProbabilityFlags {
    pub very_hot: f64,
    pub very_cold: f64,
    pub very_wet: f64,
    pub very_humid: f64,
    pub extreme_rain: f64,
    pub dangerous_uv: f64,
}

/// The normalized weather summary for the requested instant and day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Panel {
    pub temperature_c: Option<f64>,
    pub hi_c: Option<f64>,
    pub lo_c: Option<f64>,
    pub precip_1h_mm: Option<f64>,
    pub precip_24h_mm: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub uv_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_level: Option<String>,
    pub wind: Wind,
    pub flags: ProbabilityFlags,
}

/// One hour of the local day, in chronological local-day order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourPoint {
    pub local_time: String,
    pub temperature_c: Option<f64>,
    pub precip_probability_pct: Option<f64>,
    pub precip_1h_mm: Option<f64>,
    pub uv_index: Option<f64>,
}

/// Air quality summary; absent entirely when the provider cannot
/// supply it for the requested horizon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirQuality {
    /// Overall index on the provider's 0-5 ordinal scale
    pub overall_index: u8,
    pub overall_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<std::collections::BTreeMap<String, f64>>,
}

/// The unified result surfaced to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelResponse {
    pub mode: Mode,
    pub horizon_days: f64,
    pub generated_at: DateTime<Utc>,
    pub location: GpsCoordinates,
    pub timezone: String,
    pub local_date: NaiveDate,
    pub panel: Panel,
    pub hours: Vec<HourPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub air_quality: Option<AirQuality>,
    pub alerts: Vec<Alert>,
}
