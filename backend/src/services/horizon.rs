//! Horizon classification
//!
//! Pure functions of the target instant and "now"; evaluated once per
//! request and never re-evaluated mid-request.

use chrono::{DateTime, Utc};
use shared::Mode;

/// Signed distance from now to the target, in fractional days
pub fn horizon_days(target: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (target - now).num_milliseconds() as f64 / 86_400_000.0
}

/// Decide the serving mode for a horizon.
///
/// Anything clearly in the past is history; the near window up to the
/// provider's forecast limit is live forecast; beyond that only
/// climatology can answer.
pub fn classify(horizon_days: f64, max_forecast_days: f64) -> Mode {
    if horizon_days < -0.5 {
        Mode::History
    } else if horizon_days <= max_forecast_days {
        Mode::Forecast
    } else {
        Mode::Climatology
    }
}

/// Whether air quality should be part of the instant query. The
/// provider's air-quality horizon is stricter than its forecast
/// horizon, so the parameter is omitted up front beyond it.
pub fn wants_air_quality(mode: Mode, horizon_days: f64, max_air_quality_days: f64) -> bool {
    matches!(mode, Mode::Forecast | Mode::History) && horizon_days <= max_air_quality_days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn classifies_all_three_modes() {
        assert_eq!(classify(-2.0, 14.0), Mode::History);
        assert_eq!(classify(-0.4, 14.0), Mode::Forecast);
        assert_eq!(classify(3.0, 14.0), Mode::Forecast);
        assert_eq!(classify(14.0, 14.0), Mode::Forecast);
        assert_eq!(classify(14.1, 14.0), Mode::Climatology);
    }

    #[test]
    fn horizon_is_fractional_and_signed() {
        let now = Utc::now();
        let target = now + Duration::hours(36);
        assert!((horizon_days(target, now) - 1.5).abs() < 1e-9);
        let target = now - Duration::hours(12);
        assert!((horizon_days(target, now) + 0.5).abs() < 1e-9);
    }

    #[test]
    fn air_quality_gated_by_stricter_horizon() {
        assert!(wants_air_quality(Mode::Forecast, 2.0, 3.0));
        assert!(!wants_air_quality(Mode::Forecast, 3.5, 3.0));
        assert!(wants_air_quality(Mode::History, -0.2, 3.0));
        assert!(!wants_air_quality(Mode::Climatology, 20.0, 3.0));
    }
}
