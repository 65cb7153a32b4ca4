//! Weather provider client
//!
//! Speaks a Meteomatics-style "mix" API: one URL per query carrying the
//! valid time (or time range), the requested parameter list, and the
//! point coordinates, returning per-parameter date/value arrays.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use shared::GpsCoordinates;

use crate::error::{AppError, AppResult, ProviderErrorKind};

/// Parameter names in the provider's vocabulary
pub mod params {
    pub const TEMPERATURE: &str = "t_2m:C";
    pub const PRECIP_1H: &str = "precip_1h:mm";
    pub const PRECIP_24H: &str = "precip_24h:mm";
    pub const PRECIP_PROB: &str = "prob_precip_1h:p";
    pub const HUMIDITY: &str = "relative_humidity_2m:p";
    pub const UV_INDEX: &str = "uv:idx";
    pub const WIND_SPEED: &str = "wind_speed_10m:ms";
    pub const WIND_GUST: &str = "wind_gusts_10m:ms";
    pub const WIND_DIR: &str = "wind_dir_10m:d";
    pub const AIR_QUALITY: &str = "air_quality:idx";
}

/// Boundary contract consumed by the panel assembler and the
/// climatology builder. Implemented by the real client below and by
/// test doubles.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch one value per parameter at a single instant. A parameter
    /// the provider cannot supply comes back as NaN, not an error.
    async fn fetch_instant(
        &self,
        location: GpsCoordinates,
        instant: DateTime<Utc>,
        parameters: &[String],
    ) -> AppResult<HashMap<String, f64>>;

    /// Fetch an ordered hourly series per parameter over [start, end].
    async fn fetch_range(
        &self,
        location: GpsCoordinates,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step_hours: u32,
        parameters: &[String],
    ) -> AppResult<HashMap<String, Vec<(DateTime<Utc>, f64)>>>;
}

/// Upstream failure signatures that mean "this parameter cannot be
/// combined with the others at this instant". Matched once, here, and
/// surfaced as a structured error kind.
const PARAMETER_UNAVAILABLE_SIGNATURES: [&str; 2] =
    ["not available at time", "mix request failed"];

/// HTTP client for the provider's mix API
#[derive(Clone)]
pub struct MeteomaticsClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct MixResponse {
    data: Vec<MixParameter>,
}

#[derive(Debug, Deserialize)]
struct MixParameter {
    parameter: String,
    coordinates: Vec<MixCoordinate>,
}

#[derive(Debug, Deserialize)]
struct MixCoordinate {
    dates: Vec<MixDate>,
}

#[derive(Debug, Deserialize)]
struct MixDate {
    date: DateTime<Utc>,
    value: Option<serde_json::Value>,
}

impl MixDate {
    fn numeric_value(&self) -> f64 {
        self.value
            .as_ref()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }
}

impl MeteomaticsClient {
    /// Create a new client against the production endpoint
    pub fn new(base_url: String, username: String, password: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            username,
            password,
        }
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            username: String::new(),
            password: String::new(),
        }
    }

    async fn query(&self, time_segment: &str, location: GpsCoordinates, parameters: &[String]) -> AppResult<MixResponse> {
        let url = format!(
            "{}/{}/{}/{},{}/json",
            self.base_url,
            time_segment,
            parameters.join(","),
            location.latitude,
            location.longitude
        );

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| AppError::Provider {
                status: 0,
                message: format!("request failed: {}", e),
                kind: ProviderErrorKind::Upstream,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), body));
        }

        response.json().await.map_err(|e| AppError::Provider {
            status: status.as_u16(),
            message: format!("failed to parse provider response: {}", e),
            kind: ProviderErrorKind::Upstream,
        })
    }
}

/// Map an upstream failure to a structured error kind so callers never
/// have to inspect message text themselves.
fn classify_failure(status: u16, body: String) -> AppError {
    let lowered = body.to_lowercase();
    let kind = if PARAMETER_UNAVAILABLE_SIGNATURES
        .iter()
        .any(|sig| lowered.contains(sig))
    {
        ProviderErrorKind::ParameterUnavailable
    } else {
        ProviderErrorKind::Upstream
    };
    AppError::Provider {
        status,
        message: body,
        kind,
    }
}

#[async_trait]
impl WeatherProvider for MeteomaticsClient {
    async fn fetch_instant(
        &self,
        location: GpsCoordinates,
        instant: DateTime<Utc>,
        parameters: &[String],
    ) -> AppResult<HashMap<String, f64>> {
        let segment = instant.to_rfc3339_opts(SecondsFormat::Secs, true);
        let data = self.query(&segment, location, parameters).await?;

        let mut values = HashMap::new();
        for series in data.data {
            let value = series
                .coordinates
                .first()
                .and_then(|c| c.dates.first())
                .map(|d| d.numeric_value())
                .unwrap_or(f64::NAN);
            values.insert(series.parameter, value);
        }
        Ok(values)
    }

    async fn fetch_range(
        &self,
        location: GpsCoordinates,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step_hours: u32,
        parameters: &[String],
    ) -> AppResult<HashMap<String, Vec<(DateTime<Utc>, f64)>>> {
        let segment = format!(
            "{}--{}:PT{}H",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
            step_hours
        );
        let data = self.query(&segment, location, parameters).await?;

        let mut series_map = HashMap::new();
        for series in data.data {
            let points: Vec<(DateTime<Utc>, f64)> = series
                .coordinates
                .first()
                .map(|c| {
                    c.dates
                        .iter()
                        .map(|d| (d.date, d.numeric_value()))
                        .collect()
                })
                .unwrap_or_default();
            series_map.insert(series.parameter, points);
        }
        Ok(series_map)
    }
}
