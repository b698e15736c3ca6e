//! Error types for value parsing in airsight-types.

use thiserror::Error;

/// Errors that can occur when constructing or parsing model values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Latitude outside of [-90, 90] or not finite.
    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside of [-180, 180] or not finite.
    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),

    /// Unrecognized theme name.
    #[error("Unknown theme '{0}' (expected 'dark' or 'light')")]
    UnknownTheme(String),
}

/// Result type alias using airsight-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
