//! Climatology builder
//!
//! Stands in for the forecast beyond the provider's horizon: pools
//! hourly observations from the same calendar window of several prior
//! years and reduces them to per-hour-of-day statistics. Degrades
//! value by value; an empty bucket yields a missing metric, never an
//! error.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use shared::{finite, uv_level, HourPoint, Panel};

use crate::config::PanelConfig;
use crate::error::AppResult;
use crate::external::provider::params;
use crate::external::WeatherProvider;
use shared::GpsCoordinates;

/// Per-hour statistics plus the panel derived from them
#[derive(Debug, Clone)]
pub struct Climatology {
    pub panel: Panel,
    pub hours: Vec<HourPoint>,
}

/// Threshold (mm) above which a pooled hourly reading counts as rain
const RAIN_EVENT_MM: f64 = 0.1;

/// Median of the finite values; NaN when none are finite
pub fn median(values: &[f64]) -> f64 {
    let mut finite_values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite_values.is_empty() {
        return f64::NAN;
    }
    finite_values.sort_by(f64::total_cmp);
    let n = finite_values.len();
    if n % 2 == 1 {
        finite_values[n / 2]
    } else {
        (finite_values[n / 2 - 1] + finite_values[n / 2]) / 2.0
    }
}

/// Interpolated percentile (0..=1) of the finite values; NaN when none
/// are finite. Linear interpolation between the two nearest ranks.
pub fn percentile(values: &[f64], p: f64) -> f64 {
    let mut finite_values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite_values.is_empty() {
        return f64::NAN;
    }
    finite_values.sort_by(f64::total_cmp);
    let rank = p.clamp(0.0, 1.0) * (finite_values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        finite_values[lower]
    } else {
        let weight = rank - lower as f64;
        finite_values[lower] * (1.0 - weight) + finite_values[upper] * weight
    }
}

/// Fraction of finite pooled values above the rain-event threshold,
/// as a rounded percentage; NaN for an empty bucket
fn rain_probability_pct(values: &[f64]) -> f64 {
    let finite_values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite_values.is_empty() {
        return f64::NAN;
    }
    let wet = finite_values.iter().filter(|&&v| v > RAIN_EVENT_MM).count();
    (wet as f64 / finite_values.len() as f64 * 100.0).round()
}

/// The same calendar month/day as `target` in a prior year, clamped to
/// Feb 28 when the anniversary would be Feb 29 of a non-leap year
fn anniversary(target: DateTime<Utc>, years_back: i32) -> DateTime<Utc> {
    let year = target.year() - years_back;
    let date = NaiveDate::from_ymd_opt(year, target.month(), target.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, target.month(), 28))
        .unwrap_or_else(|| target.date_naive());
    date.and_time(target.time()).and_utc()
}

/// Build a climatology panel + hourly sequence for `target`.
///
/// The per-year fetches run concurrently; bucketing starts only once
/// all of them have completed.
pub async fn build<P: WeatherProvider>(
    provider: &P,
    location: GpsCoordinates,
    target: DateTime<Utc>,
    cfg: &PanelConfig,
) -> AppResult<Climatology> {
    let parameters: Vec<String> = [
        params::TEMPERATURE,
        params::PRECIP_1H,
        params::HUMIDITY,
        params::WIND_SPEED,
        params::UV_INDEX,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let fetches = (1..=cfg.climate_years_back as i32).map(|years_back| {
        let anchor = anniversary(target, years_back);
        let start = anchor - Duration::days(cfg.climate_half_window_days);
        let end = anchor + Duration::days(cfg.climate_half_window_days);
        provider.fetch_range(location, start, end, 1, &parameters)
    });
    let year_results = futures::future::try_join_all(fetches).await?;

    // Pool every fetched point per parameter across all years.
    let mut temp_buckets: [Vec<f64>; 24] = Default::default();
    let mut precip_buckets: [Vec<f64>; 24] = Default::default();
    let mut uv_buckets: [Vec<f64>; 24] = Default::default();
    let mut humidity_pool: Vec<f64> = Vec::new();
    let mut wind_pool: Vec<f64> = Vec::new();

    for result in year_results {
        for (parameter, points) in result {
            for (time, value) in points {
                let hour = time.hour() as usize % 24;
                match parameter.as_str() {
                    params::TEMPERATURE => temp_buckets[hour].push(value),
                    params::PRECIP_1H => precip_buckets[hour].push(value),
                    params::UV_INDEX => uv_buckets[hour].push(value),
                    params::HUMIDITY => humidity_pool.push(value),
                    params::WIND_SPEED => wind_pool.push(value),
                    _ => {}
                }
            }
        }
    }

    let temp_medians: Vec<f64> = temp_buckets.iter().map(|b| median(b)).collect();
    let precip_medians: Vec<f64> = precip_buckets.iter().map(|b| median(b)).collect();
    let uv_medians: Vec<f64> = uv_buckets.iter().map(|b| median(b)).collect();

    let hours: Vec<HourPoint> = (0..24)
        .map(|h| HourPoint {
            local_time: format!("{:02}:00", h),
            temperature_c: finite(temp_medians[h]),
            precip_probability_pct: finite(rain_probability_pct(&precip_buckets[h])),
            precip_1h_mm: finite(precip_medians[h]),
            uv_index: finite(uv_medians[h]),
        })
        .collect();

    // Typical rather than extreme spread: the panel hi/lo are the
    // 90th/10th percentiles of the 24 hourly medians.
    let hi = percentile(&temp_medians, 0.9);
    let lo = percentile(&temp_medians, 0.1);

    let now_hour = (target.hour() as usize).min(23);
    let uv_now = uv_medians[now_hour];
    let precip_24h: f64 = {
        let finite_sum: Vec<f64> = precip_medians.iter().copied().filter(|v| v.is_finite()).collect();
        if finite_sum.is_empty() {
            f64::NAN
        } else {
            finite_sum.iter().sum()
        }
    };

    let panel = Panel {
        temperature_c: finite(temp_medians[now_hour]),
        hi_c: finite(hi),
        lo_c: finite(lo),
        precip_1h_mm: finite(precip_medians[now_hour]),
        precip_24h_mm: finite(precip_24h),
        humidity_pct: finite(median(&humidity_pool)),
        uv_index: finite(uv_now),
        uv_level: uv_level(uv_now).map(str::to_string),
        // Gust and direction are not derivable from the pooled
        // parameters and stay missing.
        wind: shared::Wind {
            speed_ms: finite(median(&wind_pool)),
            gust_ms: None,
            direction_deg: None,
            compass: None,
        },
        flags: Default::default(),
    };

    Ok(Climatology { panel, hours })
}
