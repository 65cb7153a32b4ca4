//! Panel assembly
//!
//! Orchestrates the full pipeline: resolve the target time, classify
//! the horizon, gather live series or build climatology, derive the
//! panel fields and probability flags, and run the alert engine.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use shared::{
    air_quality_text, compass_label, finite, uv_level, AirQuality, GpsCoordinates, HourPoint,
    Mode, Panel, PanelResponse, ProbabilityFlags, Wind,
};

use crate::config::{AlertConfig, PanelConfig};
use crate::error::AppResult;
use crate::external::provider::params;
use crate::external::WeatherProvider;
use crate::services::series::{ParameterSeries, SeriesIndex};
use crate::services::{alerts, climate, horizon, time};

/// Hourly relative humidity at or above this counts toward the
/// `very_humid` flag
const VERY_HUMID_PCT: f64 = 85.0;

/// Request-scoped panel assembly service
pub struct PanelService<P> {
    provider: Arc<P>,
    panel_cfg: PanelConfig,
    alert_cfg: AlertConfig,
}

impl<P> Clone for PanelService<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            panel_cfg: self.panel_cfg.clone(),
            alert_cfg: self.alert_cfg.clone(),
        }
    }
}

fn scalar(values: &HashMap<String, f64>, parameter: &str) -> f64 {
    values.get(parameter).copied().unwrap_or(f64::NAN)
}

impl<P: WeatherProvider> PanelService<P> {
    pub fn new(provider: Arc<P>, panel_cfg: PanelConfig, alert_cfg: AlertConfig) -> Self {
        Self {
            provider,
            panel_cfg,
            alert_cfg,
        }
    }

    /// Assemble the panel for a location and optional target time/zone
    pub async fn assemble(
        &self,
        location: GpsCoordinates,
        target: Option<&str>,
        zone: Option<&str>,
    ) -> AppResult<PanelResponse> {
        self.assemble_at(location, target, zone, Utc::now()).await
    }

    /// Assembly with an injectable "now" (exercised directly by tests)
    pub async fn assemble_at(
        &self,
        location: GpsCoordinates,
        target: Option<&str>,
        zone: Option<&str>,
        now: DateTime<Utc>,
    ) -> AppResult<PanelResponse> {
        let zone_name = zone.unwrap_or(&self.panel_cfg.default_timezone);
        let resolved = time::resolve_target(target, zone_name, now)?;

        let horizon_days = horizon::horizon_days(resolved.instant, now);
        let mode = horizon::classify(horizon_days, self.panel_cfg.max_forecast_days);
        tracing::info!(
            mode = mode_label(mode),
            horizon_days,
            zone = zone_name,
            "classified panel request"
        );

        let (panel, hours, air_quality) = match mode {
            Mode::Forecast | Mode::History => {
                self.assemble_live(location, &resolved, mode, horizon_days)
                    .await?
            }
            Mode::Climatology => {
                let mut climatology = climate::build(
                    self.provider.as_ref(),
                    location,
                    resolved.instant,
                    &self.panel_cfg,
                )
                .await?;
                let index = index_from_hours(&climatology.hours, resolved.day_start);
                climatology.panel.flags = self.flags_from_index(&index);
                (climatology.panel, climatology.hours, None)
            }
        };

        let alert_inputs = alerts::AlertInputs {
            panel: &panel,
            hours: &hours,
            air_quality_index: air_quality.as_ref().map(|aq| aq.overall_index as f64),
            local_date: resolved.local_date,
            emit_notice_when_empty: self.alert_cfg.no_alert_notice && mode == Mode::Climatology,
        };
        let alert_list = alerts::compute_alerts(&alert_inputs, &self.alert_cfg);

        Ok(PanelResponse {
            mode,
            horizon_days,
            generated_at: now,
            location,
            timezone: zone_name.to_string(),
            local_date: resolved.local_date,
            panel,
            hours,
            air_quality,
            alerts: alert_list,
        })
    }

    /// Live path: one instant query (with the conditional air-quality
    /// retry) plus one ranged hourly query over the local day.
    async fn assemble_live(
        &self,
        location: GpsCoordinates,
        resolved: &time::ResolvedTime,
        mode: Mode,
        horizon_days: f64,
    ) -> AppResult<(Panel, Vec<HourPoint>, Option<AirQuality>)> {
        let want_air_quality = horizon::wants_air_quality(
            mode,
            horizon_days,
            self.panel_cfg.max_air_quality_days,
        );

        let mut instant_params: Vec<String> = [
            params::TEMPERATURE,
            params::PRECIP_1H,
            params::PRECIP_24H,
            params::HUMIDITY,
            params::UV_INDEX,
            params::WIND_SPEED,
            params::WIND_GUST,
            params::WIND_DIR,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        if want_air_quality {
            instant_params.push(params::AIR_QUALITY.to_string());
        }

        let hourly_params: Vec<String> = [
            params::TEMPERATURE,
            params::PRECIP_1H,
            params::PRECIP_PROB,
            params::HUMIDITY,
            params::UV_INDEX,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        // The two queries are independent; issue them concurrently.
        let (instant_result, hourly_result) = tokio::join!(
            self.provider
                .fetch_instant(location, resolved.instant, &instant_params),
            self.provider.fetch_range(
                location,
                resolved.day_start,
                resolved.day_end,
                1,
                &hourly_params,
            ),
        );

        let instant_values = match instant_result {
            Ok(values) => values,
            // Exactly one retry, dropping the air-quality parameter,
            // and only on the structured incompatibility signature.
            Err(e) if want_air_quality && e.is_parameter_unavailable() => {
                tracing::warn!(
                    "air quality incompatible at requested instant, retrying without it"
                );
                instant_params.retain(|p| p != params::AIR_QUALITY);
                self.provider
                    .fetch_instant(location, resolved.instant, &instant_params)
                    .await?
            }
            Err(e) => return Err(e),
        };
        let mut hourly = hourly_result?;

        let raw_series: Vec<ParameterSeries> = hourly_params
            .iter()
            .map(|p| ParameterSeries::from_pairs(p.clone(), hourly.remove(p).unwrap_or_default()))
            .collect();
        let index = SeriesIndex::build(raw_series);

        let hours = hour_points(&index, &hourly_params, resolved.zone);

        let uv_now = scalar(&instant_values, params::UV_INDEX);
        let direction = scalar(&instant_values, params::WIND_DIR);

        let mut panel = Panel {
            temperature_c: finite(scalar(&instant_values, params::TEMPERATURE)),
            hi_c: finite(index.max(params::TEMPERATURE)),
            lo_c: finite(index.min(params::TEMPERATURE)),
            precip_1h_mm: finite(scalar(&instant_values, params::PRECIP_1H)),
            precip_24h_mm: finite(scalar(&instant_values, params::PRECIP_24H)),
            humidity_pct: finite(scalar(&instant_values, params::HUMIDITY)),
            uv_index: finite(uv_now),
            uv_level: uv_level(uv_now).map(str::to_string),
            wind: Wind {
                speed_ms: finite(scalar(&instant_values, params::WIND_SPEED)),
                gust_ms: finite(scalar(&instant_values, params::WIND_GUST)),
                direction_deg: finite(direction),
                compass: compass_label(direction).map(str::to_string),
            },
            flags: Default::default(),
        };
        panel.flags = self.flags_from_index(&index);

        let air_quality = finite(scalar(&instant_values, params::AIR_QUALITY)).map(|value| {
            let overall_index = value.round().clamp(0.0, 5.0) as u8;
            AirQuality {
                overall_index,
                overall_text: air_quality_text(overall_index).to_string(),
                components: None,
            }
        });

        Ok((panel, hours, air_quality))
    }

    fn flags_from_index(&self, index: &SeriesIndex) -> ProbabilityFlags {
        let cfg = &self.alert_cfg;
        ProbabilityFlags {
            very_hot: index.fraction_meeting(params::TEMPERATURE, |v| v >= cfg.heat_warning_c),
            very_cold: index.fraction_meeting(params::TEMPERATURE, |v| v <= cfg.cold_warning_c),
            very_wet: index
                .fraction_meeting(params::PRECIP_PROB, |v| v >= cfg.rain_prob_warning_pct),
            very_humid: index.fraction_meeting(params::HUMIDITY, |v| v >= VERY_HUMID_PCT),
            extreme_rain: index
                .fraction_meeting(params::PRECIP_1H, |v| v >= cfg.rain_amount_danger_mm),
            dangerous_uv: index.fraction_meeting(params::UV_INDEX, |v| v >= cfg.uv_danger),
        }
    }
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Forecast => "forecast",
        Mode::Climatology => "climatology",
        Mode::History => "history",
    }
}

/// Project the indexed hourly series into the ordered `HourPoint`
/// sequence, labeled with wall-clock times in the request zone. The
/// longest series drives the hourly grid so one absent parameter never
/// empties the whole day.
fn hour_points(index: &SeriesIndex, hourly_params: &[String], zone: chrono_tz::Tz) -> Vec<HourPoint> {
    let driver = hourly_params
        .iter()
        .filter_map(|p| index.get(p))
        .max_by_key(|s| s.points.len());
    let Some(driver) = driver else {
        return Vec::new();
    };

    driver
        .points
        .iter()
        .map(|point| HourPoint {
            local_time: point
                .time
                .with_timezone(&zone)
                .format("%H:%M")
                .to_string(),
            temperature_c: finite(index.value_at_or_before(params::TEMPERATURE, point.time)),
            precip_probability_pct: finite(
                index.value_at_or_before(params::PRECIP_PROB, point.time),
            ),
            precip_1h_mm: finite(index.value_at_or_before(params::PRECIP_1H, point.time)),
            uv_index: finite(index.value_at_or_before(params::UV_INDEX, point.time)),
        })
        .collect()
}

/// Rebuild a lookup index from an already-assembled hourly sequence so
/// probability flags are computed uniformly across modes.
fn index_from_hours(hours: &[HourPoint], day_start: DateTime<Utc>) -> SeriesIndex {
    let nan = |v: Option<f64>| v.unwrap_or(f64::NAN);
    let mut temperature = Vec::new();
    let mut probability = Vec::new();
    let mut precip = Vec::new();
    let mut uv = Vec::new();

    for (i, hour) in hours.iter().enumerate() {
        let t = day_start + Duration::hours(i as i64);
        temperature.push((t, nan(hour.temperature_c)));
        probability.push((t, nan(hour.precip_probability_pct)));
        precip.push((t, nan(hour.precip_1h_mm)));
        uv.push((t, nan(hour.uv_index)));
    }

    // No per-hour humidity exists here; the very_humid flag reads 0
    // from the absent series.
    SeriesIndex::build(vec![
        ParameterSeries::from_pairs(params::TEMPERATURE, temperature),
        ParameterSeries::from_pairs(params::PRECIP_PROB, probability),
        ParameterSeries::from_pairs(params::PRECIP_1H, precip),
        ParameterSeries::from_pairs(params::UV_INDEX, uv),
    ])
}
