//! Core types for location, air-quality and weather data.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both axes.
    ///
    /// # Examples
    ///
    /// ```
    /// use airsight_types::Coordinate;
    ///
    /// let berlin = Coordinate::new(52.52, 13.41).unwrap();
    /// assert_eq!(berlin.latitude, 52.52);
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> ParseResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ParseError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ParseError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A location that has been resolved to coordinates and a display name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedLocation {
    /// Display name, e.g. `"Berlin, Germany"` or `"Current Location"`.
    pub name: String,
    /// Resolved position.
    pub coordinate: Coordinate,
}

impl ResolvedLocation {
    /// Create a resolved location.
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}

/// Current pollutant readings reported by the air-quality provider.
///
/// Every field is optional: a provider may omit any pollutant, and an
/// omitted value must stay absent rather than being treated as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AirQualityReading {
    /// European air-quality index.
    pub index: Option<f64>,
    /// Fine particulate matter (µg/m³).
    pub pm2_5: Option<f64>,
    /// Coarse particulate matter (µg/m³).
    pub pm10: Option<f64>,
    /// Nitrogen dioxide (µg/m³).
    pub nitrogen_dioxide: Option<f64>,
    /// Carbon monoxide (µg/m³).
    pub carbon_monoxide: Option<f64>,
}

/// One hourly point of the air-quality forecast.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForecastPoint {
    /// Display label for the hour (`HH:MM`, or the raw provider timestamp).
    pub time_label: String,
    /// Forecast index for the hour, if the provider reported one.
    pub index: Option<f64>,
}

/// Current meteorological readings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WeatherReading {
    /// Air temperature (°C).
    pub temperature: f64,
    /// Apparent ("feels like") temperature (°C).
    pub apparent_temperature: f64,
    /// Relative humidity (%).
    pub humidity_pct: f64,
    /// Wind speed (km/h).
    pub wind_speed: f64,
    /// Surface pressure (hPa).
    pub pressure: f64,
    /// WMO weather interpretation code.
    pub weather_code: i32,
}

/// A remembered location in the recent-search list.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HistoryEntry {
    /// Display name. Compared case-insensitively for de-duplication.
    pub name: String,
    /// Position the name resolved to.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub coordinate: Coordinate,
}

impl HistoryEntry {
    /// Create a history entry.
    pub fn new(name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }

    /// Check whether this entry has the same name as `other`, ignoring case.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

impl From<ResolvedLocation> for HistoryEntry {
    fn from(location: ResolvedLocation) -> Self {
        Self {
            name: location.name,
            coordinate: location.coordinate,
        }
    }
}

impl From<HistoryEntry> for ResolvedLocation {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            name: entry.name,
            coordinate: entry.coordinate,
        }
    }
}

/// Display theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ThemePreference {
    /// Dark theme (default).
    #[default]
    Dark,
    /// Light theme.
    Light,
}

impl ThemePreference {
    /// Return the other theme.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Dark,
        }
    }

    /// Lowercase name used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Dark => "dark",
            ThemePreference::Light => "light",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemePreference::Dark),
            "light" => Ok(ThemePreference::Light),
            _ => Err(ParseError::UnknownTheme(s.to_string())),
        }
    }
}
