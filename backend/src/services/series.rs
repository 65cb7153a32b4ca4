//! Parameter series indexing and point lookups
//!
//! One index is built per request from the provider's hourly response
//! and read-only afterward. Missing readings are NaN and are tolerated
//! by every operation; nothing here can fail.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// A single timestamped reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub time: DateTime<Utc>,
    pub value: f64,
}

/// An ordered series of readings for one named parameter
#[derive(Debug, Clone)]
pub struct ParameterSeries {
    pub parameter: String,
    pub points: Vec<SeriesPoint>,
}

impl ParameterSeries {
    pub fn new(parameter: impl Into<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            parameter: parameter.into(),
            points,
        }
    }

    pub fn from_pairs(parameter: impl Into<String>, pairs: Vec<(DateTime<Utc>, f64)>) -> Self {
        Self::new(
            parameter,
            pairs
                .into_iter()
                .map(|(time, value)| SeriesPoint { time, value })
                .collect(),
        )
    }
}

/// Read-only index over the parameter series of one request
#[derive(Debug, Default)]
pub struct SeriesIndex {
    series: HashMap<String, ParameterSeries>,
}

impl SeriesIndex {
    /// Build the index, sorting each series by time ascending
    pub fn build(raw: Vec<ParameterSeries>) -> Self {
        let mut series = HashMap::new();
        for mut s in raw {
            s.points.sort_by_key(|p| p.time);
            series.insert(s.parameter.clone(), s);
        }
        Self { series }
    }

    pub fn get(&self, parameter: &str) -> Option<&ParameterSeries> {
        self.series.get(parameter)
    }

    /// The point at exactly `instant`, else the latest point strictly
    /// before it, else NaN. "As of" semantics for right-aligned
    /// accumulation windows.
    pub fn value_at_or_before(&self, parameter: &str, instant: DateTime<Utc>) -> f64 {
        let Some(series) = self.series.get(parameter) else {
            return f64::NAN;
        };
        series
            .points
            .iter()
            .rev()
            .find(|p| p.time <= instant)
            .map(|p| p.value)
            .unwrap_or(f64::NAN)
    }

    /// The point whose time is closest to `instant`, ties broken by
    /// the earlier point. "Closest reading to now" semantics.
    pub fn value_nearest(&self, parameter: &str, instant: DateTime<Utc>) -> f64 {
        let Some(series) = self.series.get(parameter) else {
            return f64::NAN;
        };
        let mut best: Option<(i64, SeriesPoint)> = None;
        for point in &series.points {
            let distance = (point.time - instant).num_milliseconds().abs();
            match best {
                Some((best_distance, _)) if distance >= best_distance => {}
                _ => best = Some((distance, *point)),
            }
        }
        best.map(|(_, p)| p.value).unwrap_or(f64::NAN)
    }

    /// Maximum finite value over the full series; NaN when the series
    /// is empty or all readings are missing
    pub fn max(&self, parameter: &str) -> f64 {
        self.fold_finite(parameter, f64::max)
    }

    /// Minimum finite value over the full series; NaN when the series
    /// is empty or all readings are missing
    pub fn min(&self, parameter: &str) -> f64 {
        self.fold_finite(parameter, f64::min)
    }

    fn fold_finite(&self, parameter: &str, pick: fn(f64, f64) -> f64) -> f64 {
        let Some(series) = self.series.get(parameter) else {
            return f64::NAN;
        };
        series
            .points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(f64::NAN, |acc, v| if acc.is_nan() { v } else { pick(acc, v) })
    }

    /// Fraction of points satisfying `predicate`, out of all points,
    /// rounded to 2 decimals; 0 for an empty or absent series.
    /// NaN readings never satisfy a comparison, so they count against
    /// the fraction, matching "percentage of hours" semantics.
    pub fn fraction_meeting(&self, parameter: &str, predicate: impl Fn(f64) -> bool) -> f64 {
        let Some(series) = self.series.get(parameter) else {
            return 0.0;
        };
        if series.points.is_empty() {
            return 0.0;
        }
        let meeting = series.points.iter().filter(|p| predicate(p.value)).count();
        let fraction = meeting as f64 / series.points.len() as f64;
        (fraction * 100.0).round() / 100.0
    }
}
