//! Platform-agnostic types for air-quality and weather sessions.
//!
//! This crate provides the shared data model used by the session core
//! (airsight-core), the persistence layer (airsight-store) and any
//! presentation layer built on top of them.
//!
//! # Features
//!
//! - Coordinates and resolved locations
//! - Air-quality, forecast and weather readings with explicit absence
//! - Recent-location history entries
//! - Theme preference
//!
//! # Example
//!
//! ```
//! use airsight_types::{Coordinate, HistoryEntry, ThemePreference};
//!
//! let entry = HistoryEntry::new("Paris, France", Coordinate::new(48.85, 2.35).unwrap());
//! assert!(entry.same_name("paris, france"));
//! assert_eq!(ThemePreference::default(), ThemePreference::Dark);
//! ```

pub mod error;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use types::{
    AirQualityReading, Coordinate, ForecastPoint, HistoryEntry, ResolvedLocation,
    ThemePreference, WeatherReading,
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // --- Coordinate tests ---

    #[test]
    fn test_coordinate_accepts_bounds() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(ParseError::InvalidLatitude(90.5))
        );
        assert_eq!(
            Coordinate::new(0.0, -181.0),
            Err(ParseError::InvalidLongitude(-181.0))
        );
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(52.5, 13.4).unwrap();
        assert_eq!(c.to_string(), "52.5000, 13.4000");
    }

    proptest! {
        #[test]
        fn prop_valid_coordinates_roundtrip(lat in -90.0f64..=90.0, lon in -180.0f64..=180.0) {
            let c = Coordinate::new(lat, lon).unwrap();
            prop_assert_eq!(c.latitude, lat);
            prop_assert_eq!(c.longitude, lon);
        }
    }

    // --- HistoryEntry tests ---

    #[test]
    fn test_history_entry_same_name_ignores_case() {
        let c = Coordinate::new(41.9, 12.5).unwrap();
        let entry = HistoryEntry::new("Rome, Italy", c);
        assert!(entry.same_name("ROME, ITALY"));
        assert!(entry.same_name("rome, italy"));
        assert!(!entry.same_name("Rome"));
    }

    #[test]
    fn test_history_entry_preserves_display_case() {
        let c = Coordinate::new(41.9, 12.5).unwrap();
        let entry = HistoryEntry::new("Rome, Italy", c);
        assert_eq!(entry.name, "Rome, Italy");
    }

    #[test]
    fn test_history_entry_from_resolved_location() {
        let c = Coordinate::new(59.9, 10.7).unwrap();
        let entry: HistoryEntry = ResolvedLocation::new("Oslo, Norway", c).into();
        assert_eq!(entry.name, "Oslo, Norway");
        assert_eq!(entry.coordinate, c);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_history_entry_serializes_flat() {
        let c = Coordinate::new(59.9, 10.7).unwrap();
        let entry = HistoryEntry::new("Oslo, Norway", c);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Oslo, Norway");
        assert_eq!(json["latitude"], 59.9);
        assert_eq!(json["longitude"], 10.7);
    }

    // --- ThemePreference tests ---

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(ThemePreference::default(), ThemePreference::Dark);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(ThemePreference::Dark.toggled(), ThemePreference::Light);
        assert_eq!(ThemePreference::Light.toggled(), ThemePreference::Dark);
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("dark".parse::<ThemePreference>(), Ok(ThemePreference::Dark));
        assert_eq!(" LIGHT ".parse::<ThemePreference>(), Ok(ThemePreference::Light));
        assert!("sepia".parse::<ThemePreference>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_theme_serde_lowercase() {
        let json = serde_json::to_string(&ThemePreference::Light).unwrap();
        assert_eq!(json, "\"light\"");
        let back: ThemePreference = serde_json::from_str("\"dark\"").unwrap();
        assert_eq!(back, ThemePreference::Dark);
    }

    // --- AirQualityReading tests ---

    #[test]
    fn test_air_quality_default_is_all_absent() {
        let reading = AirQualityReading::default();
        assert!(reading.index.is_none());
        assert!(reading.pm2_5.is_none());
        assert!(reading.carbon_monoxide.is_none());
    }
}
