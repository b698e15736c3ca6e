//! Error types for airsight-core.
//!
//! This module defines the errors that can end a session request, plus the
//! errors raised at the best-effort boundaries (persistence and alert
//! dispatch) which are logged and discarded rather than surfaced.
//!
//! # Recovery
//!
//! | Error Type | Surfaces as | Retried by core |
//! |------------|-------------|-----------------|
//! | [`Error::PermissionDenied`] | `Failed{PermissionDenied}` | No |
//! | [`Error::LocationUnavailable`] | `Failed{LocationUnavailable}` | No |
//! | [`Error::InvalidQuery`] | `Failed{InvalidQuery}` | No |
//! | [`Error::NotFound`] | `Failed{NotFound}` | No |
//! | [`Error::DataUnavailable`] | `Failed{DataUnavailable}` | No |
//! | [`Error::Transport`] | `Failed{TransportError}` | No |
//! | [`PersistenceError`] | `warn!` log only | No |
//! | [`SinkError`] | `warn!` log only | No |
//!
//! Retrying is always a user action: dispatching a new request restarts the
//! flow from scratch.

use core::fmt;

use thiserror::Error;

/// Classification of a failed request, carried by `SessionState::Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Device location permission was refused.
    PermissionDenied,
    /// Permission granted but no position fix could be obtained.
    LocationUnavailable,
    /// Search text was empty or whitespace.
    InvalidQuery,
    /// Geocoding returned no candidate.
    NotFound,
    /// Provider responded without the required current index.
    DataUnavailable,
    /// Network or HTTP failure at any provider.
    TransportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::PermissionDenied => "permission denied",
            ErrorKind::LocationUnavailable => "location unavailable",
            ErrorKind::InvalidQuery => "invalid query",
            ErrorKind::NotFound => "not found",
            ErrorKind::DataUnavailable => "data unavailable",
            ErrorKind::TransportError => "transport error",
        };
        f.write_str(s)
    }
}

/// External provider that produced a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Free-text place name resolution.
    Geocoding,
    /// Current pollutants and hourly forecast.
    AirQuality,
    /// Current meteorological readings.
    Weather,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Geocoding => write!(f, "geocoding"),
            Provider::AirQuality => write!(f, "air quality"),
            Provider::Weather => write!(f, "weather"),
        }
    }
}

/// Errors that terminate a session request.
///
/// Each variant maps onto exactly one [`ErrorKind`]; the `Display`
/// implementation is the human-readable message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Location permission was denied.
    #[error("Permission to access location was denied")]
    PermissionDenied,

    /// The position fix failed after permission was granted.
    #[error("Error getting current location: {0}")]
    LocationUnavailable(String),

    /// Empty or whitespace-only search text.
    #[error("Please enter a city name to search")]
    InvalidQuery,

    /// No geocoding candidate for the query.
    #[error("Location '{query}' not found. Please try another city.")]
    NotFound {
        /// The search text as submitted.
        query: String,
    },

    /// The air-quality response omitted the current index.
    #[error("Could not fetch air quality data for this location")]
    DataUnavailable,

    /// Network or HTTP failure.
    #[error("Error contacting {provider} service: {message}")]
    Transport {
        /// Which provider failed.
        provider: Provider,
        /// HTTP status, when the server answered.
        status: Option<u16>,
        /// Underlying failure description.
        message: String,
    },
}

impl Error {
    /// Create a not-found error for a query.
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create a transport error without an HTTP status.
    pub fn transport(provider: Provider, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            status: None,
            message: message.into(),
        }
    }

    /// Create a transport error for a non-success HTTP status.
    pub fn http_status(provider: Provider, status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            provider,
            status: Some(status),
            message: message.into(),
        }
    }

    /// The classification carried into `SessionState::Failed`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PermissionDenied => ErrorKind::PermissionDenied,
            Error::LocationUnavailable(_) => ErrorKind::LocationUnavailable,
            Error::InvalidQuery => ErrorKind::InvalidQuery,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::DataUnavailable => ErrorKind::DataUnavailable,
            Error::Transport { .. } => ErrorKind::TransportError,
        }
    }
}

/// Result type alias using airsight-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure at the key-value persistence boundary.
///
/// Never escalated to the session state; callers log and continue.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    /// The backing store failed to read or write.
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A value could not be encoded for storage.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure delivering a notification or haptic.
#[derive(Debug, Error)]
#[error("Alert delivery failed: {0}")]
pub struct SinkError(pub String);
