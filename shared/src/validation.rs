//! Validation utilities for panel requests

use crate::types::GpsCoordinates;

/// Validate that coordinates name a real point on the globe
pub fn validate_coordinates(location: &GpsCoordinates) -> Result<(), &'static str> {
    if !location.latitude.is_finite() || !location.longitude.is_finite() {
        return Err("Coordinates must be finite numbers");
    }
    if location.latitude < -90.0 || location.latitude > 90.0 {
        return Err("Latitude must be between -90 and 90");
    }
    if location.longitude < -180.0 || location.longitude > 180.0 {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate a named IANA time zone string
pub fn validate_timezone(name: &str) -> Result<chrono_tz::Tz, &'static str> {
    name.parse::<chrono_tz::Tz>()
        .map_err(|_| "Unknown time zone name")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_coordinates() {
        assert!(validate_coordinates(&GpsCoordinates::new(29.09, -110.96)).is_ok());
        assert!(validate_coordinates(&GpsCoordinates::new(-90.0, 180.0)).is_ok());
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert!(validate_coordinates(&GpsCoordinates::new(91.0, 0.0)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(0.0, -181.0)).is_err());
        assert!(validate_coordinates(&GpsCoordinates::new(f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn resolves_known_timezones() {
        assert!(validate_timezone("America/Mazatlan").is_ok());
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("Not/AZone").is_err());
    }
}
