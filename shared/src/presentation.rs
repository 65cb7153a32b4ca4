//! Presentation helpers for panel fields
//!
//! Pure projections from numeric readings to display text. These never
//! fail: non-finite inputs simply yield `None`.

/// Qualitative UV level per the WHO UV index bands
pub fn uv_level(index: f64) -> Option<&'static str> {
    if !index.is_finite() || index < 0.0 {
        return None;
    }
    Some(match index {
        i if i < 3.0 => "Low",
        i if i < 6.0 => "Moderate",
        i if i < 8.0 => "High",
        i if i < 11.0 => "Very High",
        _ => "Extreme",
    })
}

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point compass label for a wind direction in degrees
pub fn compass_label(degrees: f64) -> Option<&'static str> {
    if !degrees.is_finite() {
        return None;
    }
    let normalized = degrees.rem_euclid(360.0);
    let sector = ((normalized / 22.5) + 0.5).floor() as usize % 16;
    Some(COMPASS_POINTS[sector])
}

/// Descriptive text for the 0-5 air quality ordinal
pub fn air_quality_text(index: u8) -> &'static str {
    match index {
        0 => "Good",
        1 => "Fair",
        2 => "Moderate",
        3 => "Poor",
        4 => "Very Poor",
        _ => "Hazardous",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_levels_follow_who_bands() {
        assert_eq!(uv_level(0.0), Some("Low"));
        assert_eq!(uv_level(2.9), Some("Low"));
        assert_eq!(uv_level(3.0), Some("Moderate"));
        assert_eq!(uv_level(7.5), Some("High"));
        assert_eq!(uv_level(8.0), Some("Very High"));
        assert_eq!(uv_level(11.0), Some("Extreme"));
        assert_eq!(uv_level(f64::NAN), None);
    }

    #[test]
    fn compass_wraps_and_centers() {
        assert_eq!(compass_label(0.0), Some("N"));
        assert_eq!(compass_label(359.9), Some("N"));
        assert_eq!(compass_label(45.0), Some("NE"));
        assert_eq!(compass_label(90.0), Some("E"));
        assert_eq!(compass_label(225.0), Some("SW"));
        assert_eq!(compass_label(-90.0), Some("W"));
        assert_eq!(compass_label(f64::INFINITY), None);
    }

    #[test]
    fn air_quality_labels_cover_scale() {
        assert_eq!(air_quality_text(0), "Good");
        assert_eq!(air_quality_text(3), "Poor");
        assert_eq!(air_quality_text(5), "Hazardous");
        assert_eq!(air_quality_text(9), "Hazardous");
    }
}
