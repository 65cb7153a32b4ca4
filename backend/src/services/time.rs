//! Target time resolution
//!
//! Turns an ambiguous target time plus a named zone into an absolute
//! UTC instant and the UTC window covering that instant's local day.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AppError, AppResult};

/// A resolved target: the absolute instant plus its local-day window
#[derive(Debug, Clone)]
pub struct ResolvedTime {
    pub instant: DateTime<Utc>,
    pub zone: Tz,
    pub local_date: NaiveDate,
    /// UTC instant of local 00:00:00.000
    pub day_start: DateTime<Utc>,
    /// UTC instant of local 23:59:59.999
    pub day_end: DateTime<Utc>,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Resolve a target time string in a named zone.
///
/// A string carrying explicit offset information is taken literally as
/// an absolute instant; the zone only shapes its local-day window. A
/// naive string is read as wall-clock time in the zone. An absent
/// target means "now".
pub fn resolve_target(
    target: Option<&str>,
    zone_name: &str,
    now: DateTime<Utc>,
) -> AppResult<ResolvedTime> {
    let zone: Tz = zone_name.parse().map_err(|_| AppError::Validation {
        field: "tz".to_string(),
        message: format!("Unknown time zone: {}", zone_name),
    })?;

    let instant = match target {
        None => now,
        Some(s) => parse_target(s, zone)?,
    };

    let (local_date, day_start, day_end) = local_day_window(instant, zone)?;

    Ok(ResolvedTime {
        instant,
        zone,
        local_date,
        day_start,
        day_end,
    })
}

fn parse_target(s: &str, zone: Tz) -> AppResult<DateTime<Utc>> {
    // Explicit offset wins; the clock digits are not re-interpreted.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return local_to_utc(naive, zone);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return local_to_utc(naive, zone);
        }
    }

    Err(AppError::Validation {
        field: "time".to_string(),
        message: format!("Unparseable target time: {}", s),
    })
}

/// Convert a naive wall-clock time to UTC in the given zone.
///
/// Ambiguous times (DST fall-back) resolve to the earlier offset; a
/// time inside a spring-forward gap resolves to one hour later, the
/// first wall-clock minute that exists.
fn local_to_utc(naive: NaiveDateTime, zone: Tz) -> AppResult<DateTime<Utc>> {
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, _) => Ok(earlier.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = naive + chrono::Duration::hours(1);
            zone.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| AppError::BadRequest(format!("Unresolvable local time: {}", naive)))
        }
    }
}

/// Compute the UTC window for the local calendar day containing
/// `instant` in `zone`. Across DST transitions the window spans 23,
/// 24, or 25 wall-clock hours.
pub fn local_day_window(
    instant: DateTime<Utc>,
    zone: Tz,
) -> AppResult<(NaiveDate, DateTime<Utc>, DateTime<Utc>)> {
    let local_date = instant.with_timezone(&zone).date_naive();

    let start_naive = local_date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Internal("invalid day start".to_string()))?;
    let end_naive = local_date
        .and_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| AppError::Internal("invalid day end".to_string()))?;

    let start = local_to_utc(start_naive, zone)?;
    let end = local_to_utc(end_naive, zone)?;

    Ok((local_date, start, end))
}
