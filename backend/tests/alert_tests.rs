//! Alert engine integration tests
//!
//! Rule ordering, tier suppression, window merging, deduplication and
//! the configurable informational notice.

use chrono::NaiveDate;
use proptest::prelude::*;
use shared::{AlertLevel, HourPoint, Panel};

use pointcast_backend::config::AlertConfig;
use pointcast_backend::services::alerts::{compute_alerts, AlertInputs};

fn hour(index: usize) -> HourPoint {
    HourPoint {
        local_time: format!("{:02}:00", index),
        temperature_c: None,
        precip_probability_pct: None,
        precip_1h_mm: None,
        uv_index: None,
    }
}

fn quiet_day() -> Vec<HourPoint> {
    (0..24).map(hour).collect()
}

fn local_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 20).unwrap()
}

fn inputs<'a>(panel: &'a Panel, hours: &'a [HourPoint]) -> AlertInputs<'a> {
    AlertInputs {
        panel,
        hours,
        air_quality_index: None,
        local_date: local_date(),
        emit_notice_when_empty: false,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn uv_danger_run_yields_one_windowed_alert() {
        let cfg = AlertConfig::default();
        let mut hours = quiet_day();
        for (i, uv) in [2.0, 2.0, 9.0, 9.0, 9.0, 2.0].iter().enumerate() {
            hours[i].uv_index = Some(*uv);
        }
        let panel = Panel::default();
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Danger);
        assert_eq!(alerts[0].source, "uv");
        assert!(alerts[0].text.contains("02:00-04:00"), "{}", alerts[0].text);
    }

    #[test]
    fn uv_danger_suppresses_uv_warning() {
        let cfg = AlertConfig::default();
        let mut hours = quiet_day();
        // Hours 10-12 reach warning (6), hour 13 reaches danger (8);
        // the warning tier must not also fire.
        hours[10].uv_index = Some(6.5);
        hours[11].uv_index = Some(7.0);
        hours[12].uv_index = Some(6.5);
        hours[13].uv_index = Some(9.0);
        let panel = Panel::default();
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        let uv: Vec<_> = alerts.iter().filter(|a| a.source == "uv").collect();
        assert_eq!(uv.len(), 1);
        assert_eq!(uv[0].level, AlertLevel::Danger);
    }

    #[test]
    fn heat_danger_suppresses_heat_warning() {
        // hi = 41 clears both the 35 warning and 40 danger thresholds;
        // only the danger alert may appear.
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let panel = Panel {
            hi_c: Some(41.0),
            ..Default::default()
        };
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        let temp: Vec<_> = alerts.iter().filter(|a| a.source == "temperature").collect();
        assert_eq!(temp.len(), 1);
        assert_eq!(temp[0].level, AlertLevel::Danger);
    }

    #[test]
    fn cold_low_fires_independently_of_hot_high() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let panel = Panel {
            hi_c: Some(36.0),
            lo_c: Some(-1.0),
            ..Default::default()
        };
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        let temp: Vec<_> = alerts.iter().filter(|a| a.source == "temperature").collect();
        assert_eq!(temp.len(), 2);
        assert!(temp.iter().all(|a| a.level == AlertLevel::Warning));
    }

    #[test]
    fn rain_danger_window_suppresses_warning_scan() {
        let cfg = AlertConfig::default();
        let mut hours = quiet_day();
        // Warning-level probabilities all afternoon, one hour of
        // danger-level amount.
        for i in 12..18 {
            hours[i].precip_probability_pct = Some(70.0);
        }
        hours[15].precip_1h_mm = Some(20.0);
        let panel = Panel::default();
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        let rain: Vec<_> = alerts.iter().filter(|a| a.source == "rain").collect();
        assert_eq!(rain.len(), 1);
        assert_eq!(rain[0].level, AlertLevel::Danger);
        assert!(rain[0].text.contains("15:00"), "{}", rain[0].text);
    }

    #[test]
    fn rain_amount_alone_triggers_warning() {
        let cfg = AlertConfig::default();
        let mut hours = quiet_day();
        hours[6].precip_1h_mm = Some(5.0);
        let panel = Panel::default();
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);

        let rain: Vec<_> = alerts.iter().filter(|a| a.source == "rain").collect();
        assert_eq!(rain.len(), 1);
        assert_eq!(rain[0].level, AlertLevel::Warning);
    }

    #[test]
    fn gust_tiers() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let mut panel = Panel::default();

        panel.wind.gust_ms = Some(18.0);
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Warning);

        panel.wind.gust_ms = Some(26.0);
        let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Danger);
    }

    #[test]
    fn heat_stress_needs_both_temperature_and_humidity() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();

        let humid = Panel {
            temperature_c: Some(34.0),
            humidity_pct: Some(85.0),
            ..Default::default()
        };
        let alerts = compute_alerts(&inputs(&humid, &hours), &cfg);
        assert!(alerts.iter().any(|a| a.source == "heat-stress"));

        let no_humidity = Panel {
            temperature_c: Some(34.0),
            ..Default::default()
        };
        let alerts = compute_alerts(&inputs(&no_humidity, &hours), &cfg);
        assert!(alerts.iter().all(|a| a.source != "heat-stress"));
    }

    #[test]
    fn air_quality_fires_only_when_index_supplied() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let panel = Panel::default();

        let mut with_aqi = inputs(&panel, &hours);
        with_aqi.air_quality_index = Some(4.0);
        let alerts = compute_alerts(&with_aqi, &cfg);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].source, "air-quality");
        assert_eq!(alerts[0].level, AlertLevel::Danger);

        assert!(compute_alerts(&inputs(&panel, &hours), &cfg).is_empty());
    }

    #[test]
    fn busy_day_output_has_no_duplicate_entries() {
        let cfg = AlertConfig::default();
        let mut hours = quiet_day();
        for hour in hours.iter_mut() {
            hour.uv_index = Some(9.0);
            hour.precip_probability_pct = Some(90.0);
        }
        let panel = Panel {
            temperature_c: Some(38.0),
            hi_c: Some(42.0),
            lo_c: Some(-12.0),
            humidity_pct: Some(80.0),
            ..Default::default()
        };
        let mut busy = inputs(&panel, &hours);
        busy.air_quality_index = Some(5.0);
        let alerts = compute_alerts(&busy, &cfg);

        assert!(alerts.len() >= 5);
        for (i, a) in alerts.iter().enumerate() {
            for b in &alerts[i + 1..] {
                assert!(!(a.level == b.level && a.text == b.text));
            }
        }
    }

    #[test]
    fn notice_emitted_only_when_requested_and_quiet() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let panel = Panel::default();

        let mut quiet = inputs(&panel, &hours);
        quiet.emit_notice_when_empty = true;
        let alerts = compute_alerts(&quiet, &cfg);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Info);
        assert_eq!(alerts[0].source, "panel");
        assert!(alerts[0].text.contains("2026-08-20"), "{}", alerts[0].text);
    }

    #[test]
    fn notice_suppressed_when_a_rule_fired() {
        let cfg = AlertConfig::default();
        let hours = quiet_day();
        let panel = Panel {
            hi_c: Some(36.0),
            ..Default::default()
        };
        let mut with_notice = inputs(&panel, &hours);
        with_notice.emit_notice_when_empty = true;
        let alerts = compute_alerts(&with_notice, &cfg);

        assert!(alerts.iter().all(|a| a.level != AlertLevel::Info));
    }

    #[test]
    fn missing_everything_yields_no_alerts() {
        let cfg = AlertConfig::default();
        let alerts = compute_alerts(&inputs(&Panel::default(), &[]), &cfg);
        assert!(alerts.is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn uv_day_strategy() -> impl Strategy<Value = Vec<Option<f64>>> {
        prop::collection::vec(prop::option::of(0.0f64..14.0), 24)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// At most one UV alert ever fires, whatever the hourly profile.
        #[test]
        fn at_most_one_uv_alert(uv in uv_day_strategy()) {
            let cfg = AlertConfig::default();
            let mut hours = quiet_day();
            for (hour, value) in hours.iter_mut().zip(&uv) {
                hour.uv_index = *value;
            }
            let panel = Panel::default();
            let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);
            let uv_alerts = alerts.iter().filter(|a| a.source == "uv").count();
            prop_assert!(uv_alerts <= 1);
        }

        /// No (level, text) pair appears twice in the output.
        #[test]
        fn output_is_deduplicated(
            hi in prop::option::of(-20.0f64..50.0),
            lo in prop::option::of(-30.0f64..40.0),
            gust in prop::option::of(0.0f64..40.0),
        ) {
            let cfg = AlertConfig::default();
            let hours = quiet_day();
            let mut panel = Panel::default();
            panel.hi_c = hi;
            panel.lo_c = lo;
            panel.wind.gust_ms = gust;
            let alerts = compute_alerts(&inputs(&panel, &hours), &cfg);
            for (i, a) in alerts.iter().enumerate() {
                for b in &alerts[i + 1..] {
                    prop_assert!(!(a.level == b.level && a.text == b.text));
                }
            }
        }

        /// The informational notice appears exactly when nothing fired
        /// and it was requested.
        #[test]
        fn notice_is_exclusive_with_real_alerts(hi in prop::option::of(-20.0f64..50.0)) {
            let cfg = AlertConfig::default();
            let hours = quiet_day();
            let panel = Panel { hi_c: hi, ..Default::default() };
            let mut request = inputs(&panel, &hours);
            request.emit_notice_when_empty = true;
            let alerts = compute_alerts(&request, &cfg);
            let info = alerts.iter().filter(|a| a.level == AlertLevel::Info).count();
            let real = alerts.len() - info;
            prop_assert!(!alerts.is_empty());
            prop_assert!((info == 1) != (real > 0));
        }
    }
}
