//! Alert engine
//!
//! Scans the assembled panel and its hourly sequence against the
//! configured two-tier thresholds. Total over its inputs: any
//! combination of missing data produces fewer alerts, never a failure.

use chrono::NaiveDate;
use shared::{Alert, AlertLevel, HourPoint, Panel};

use crate::config::AlertConfig;

/// Everything the rule set looks at for one request
pub struct AlertInputs<'a> {
    pub panel: &'a Panel,
    pub hours: &'a [HourPoint],
    /// Overall air-quality ordinal when the provider supplied one
    pub air_quality_index: Option<f64>,
    pub local_date: NaiveDate,
    /// Emit the informational "no significant alerts" entry when no
    /// rule fired (the degraded/climatology path)
    pub emit_notice_when_empty: bool,
}

/// A contiguous run of hours satisfying a predicate
#[derive(Debug, PartialEq)]
struct HourWindow {
    start: String,
    end: String,
}

impl HourWindow {
    fn render(&self) -> String {
        if self.start == self.end {
            self.start.clone()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }
}

/// Scan the hourly sequence in order and merge consecutive matching
/// hours into windows; a predicate-false hour (or the sequence end)
/// closes the current run.
fn merge_windows(hours: &[HourPoint], predicate: impl Fn(&HourPoint) -> bool) -> Vec<HourWindow> {
    let mut windows = Vec::new();
    let mut run: Option<HourWindow> = None;

    for hour in hours {
        if predicate(hour) {
            match &mut run {
                Some(window) => window.end = hour.local_time.clone(),
                None => {
                    run = Some(HourWindow {
                        start: hour.local_time.clone(),
                        end: hour.local_time.clone(),
                    })
                }
            }
        } else if let Some(window) = run.take() {
            windows.push(window);
        }
    }
    if let Some(window) = run.take() {
        windows.push(window);
    }
    windows
}

fn render_windows(windows: &[HourWindow]) -> String {
    windows
        .iter()
        .map(HourWindow::render)
        .collect::<Vec<_>>()
        .join(", ")
}

fn at_least(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v >= threshold)
}

/// Apparent temperature from air temperature and relative humidity,
/// via the Magnus dew-point approximation and the humidex formula.
/// NaN when either input is missing.
pub fn apparent_temperature_c(temp_c: f64, humidity_pct: f64) -> f64 {
    if !temp_c.is_finite() || !humidity_pct.is_finite() {
        return f64::NAN;
    }
    let rh = humidity_pct.clamp(1.0, 100.0);
    let gamma = (rh / 100.0).ln() + 17.625 * temp_c / (243.04 + temp_c);
    let dew_point = 243.04 * gamma / (17.625 - gamma);
    let vapor_pressure = 6.112 * (17.67 * dew_point / (dew_point + 243.5)).exp();
    temp_c + 0.5555 * (vapor_pressure - 10.0)
}

/// Evaluate the full rule set in order and return the deduplicated
/// alert sequence.
pub fn compute_alerts(inputs: &AlertInputs, cfg: &AlertConfig) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = Vec::new();

    // (1) UV, windowed. The danger tier supersedes the warning tier
    // entirely when any hour reaches it.
    let danger_windows = merge_windows(inputs.hours, |h| at_least(h.uv_index, cfg.uv_danger));
    if !danger_windows.is_empty() {
        alerts.push(Alert::new(
            AlertLevel::Danger,
            "uv",
            format!(
                "Extreme UV (index {} or higher) expected {}",
                cfg.uv_danger,
                render_windows(&danger_windows)
            ),
        ));
    } else {
        let warning_windows = merge_windows(inputs.hours, |h| at_least(h.uv_index, cfg.uv_warning));
        if !warning_windows.is_empty() {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "uv",
                format!(
                    "High UV (index {} or higher) expected {}",
                    cfg.uv_warning,
                    render_windows(&warning_windows)
                ),
            ));
        }
    }

    // (2) Daily high/low temperature, single-shot.
    if let Some(hi) = inputs.panel.hi_c {
        if hi >= cfg.heat_danger_c {
            alerts.push(Alert::new(
                AlertLevel::Danger,
                "temperature",
                format!("Dangerous heat: daily high {:.1}°C", hi),
            ));
        } else if hi >= cfg.heat_warning_c {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "temperature",
                format!("Hot day ahead: daily high {:.1}°C", hi),
            ));
        }
    }
    if let Some(lo) = inputs.panel.lo_c {
        if lo <= cfg.cold_danger_c {
            alerts.push(Alert::new(
                AlertLevel::Danger,
                "temperature",
                format!("Dangerous cold: daily low {:.1}°C", lo),
            ));
        } else if lo <= cfg.cold_warning_c {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "temperature",
                format!("Freezing conditions: daily low {:.1}°C", lo),
            ));
        }
    }

    // (3) Rain, windowed over probability OR hourly amount. A firing
    // danger tier suppresses the warning-tier scan.
    let rain_danger = merge_windows(inputs.hours, |h| {
        at_least(h.precip_probability_pct, cfg.rain_prob_danger_pct)
            || at_least(h.precip_1h_mm, cfg.rain_amount_danger_mm)
    });
    if !rain_danger.is_empty() {
        alerts.push(Alert::new(
            AlertLevel::Danger,
            "rain",
            format!("Heavy rain expected {}", render_windows(&rain_danger)),
        ));
    } else {
        let rain_warning = merge_windows(inputs.hours, |h| {
            at_least(h.precip_probability_pct, cfg.rain_prob_warning_pct)
                || at_least(h.precip_1h_mm, cfg.rain_amount_warning_mm)
        });
        if !rain_warning.is_empty() {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "rain",
                format!("Rain likely {}", render_windows(&rain_warning)),
            ));
        }
    }

    // (4) Wind gust, single-shot.
    if let Some(gust) = inputs.panel.wind.gust_ms {
        if gust >= cfg.gust_danger_ms {
            alerts.push(Alert::new(
                AlertLevel::Danger,
                "wind",
                format!("Damaging wind gusts up to {:.0} m/s", gust),
            ));
        } else if gust >= cfg.gust_warning_ms {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "wind",
                format!("Strong wind gusts up to {:.0} m/s", gust),
            ));
        }
    }

    // (5) Heat stress from temperature + humidity, when both exist.
    if let (Some(temp), Some(humidity)) = (inputs.panel.temperature_c, inputs.panel.humidity_pct) {
        let apparent = apparent_temperature_c(temp, humidity);
        if apparent.is_finite() {
            if apparent >= cfg.apparent_danger_c {
                alerts.push(Alert::new(
                    AlertLevel::Danger,
                    "heat-stress",
                    format!("Severe heat stress: feels like {:.0}°C", apparent),
                ));
            } else if apparent >= cfg.apparent_warning_c {
                alerts.push(Alert::new(
                    AlertLevel::Warning,
                    "heat-stress",
                    format!("Heat stress likely: feels like {:.0}°C", apparent),
                ));
            }
        }
    }

    // (6) Air quality, only when an index was supplied.
    if let Some(aqi) = inputs.air_quality_index.filter(|v| v.is_finite()) {
        if aqi >= cfg.air_quality_danger {
            alerts.push(Alert::new(
                AlertLevel::Danger,
                "air-quality",
                "Very poor air quality: limit outdoor activity".to_string(),
            ));
        } else if aqi >= cfg.air_quality_warning {
            alerts.push(Alert::new(
                AlertLevel::Warning,
                "air-quality",
                "Poor air quality: sensitive groups should take care".to_string(),
            ));
        }
    }

    // Drop any later alert repeating an earlier (level, text) pair.
    let mut seen: Vec<(AlertLevel, String)> = Vec::new();
    alerts.retain(|alert| {
        let key = (alert.level, alert.text.clone());
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });

    if alerts.is_empty() && inputs.emit_notice_when_empty {
        alerts.push(Alert::new(
            AlertLevel::Info,
            "panel",
            format!("No significant weather alerts for {}", inputs.local_date),
        ));
    }

    alerts
}
