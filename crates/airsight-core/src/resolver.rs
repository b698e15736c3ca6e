//! Turns "current device position" or a free-text query into a resolved
//! location.

use std::sync::Arc;

use tracing::{debug, info};

use airsight_types::ResolvedLocation;

use crate::error::{Error, Result};
use crate::traits::{GeocodingService, GeolocationProvider, PermissionStatus};

/// Display name given to the device's own position.
pub const CURRENT_LOCATION_LABEL: &str = "Current Location";

/// Resolves locations through the geolocation provider or geocoding service.
#[derive(Clone)]
pub struct LocationResolver {
    geolocation: Arc<dyn GeolocationProvider>,
    geocoding: Arc<dyn GeocodingService>,
    current_label: String,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("current_label", &self.current_label)
            .finish_non_exhaustive()
    }
}

impl LocationResolver {
    /// Create a resolver.
    pub fn new(
        geolocation: Arc<dyn GeolocationProvider>,
        geocoding: Arc<dyn GeocodingService>,
    ) -> Self {
        Self {
            geolocation,
            geocoding,
            current_label: CURRENT_LOCATION_LABEL.to_string(),
        }
    }

    /// Override the name used for the device position.
    #[must_use]
    pub fn with_current_label(mut self, label: impl Into<String>) -> Self {
        self.current_label = label.into();
        self
    }

    /// Resolve the device's own position.
    ///
    /// Returns [`Error::PermissionDenied`] without asking for a fix when the
    /// permission request is refused.
    pub async fn resolve_current(&self) -> Result<ResolvedLocation> {
        if self.geolocation.request_permission().await == PermissionStatus::Denied {
            info!("Location permission denied");
            return Err(Error::PermissionDenied);
        }

        let coordinate = self
            .geolocation
            .current_position()
            .await
            .map_err(|e| match e {
                Error::LocationUnavailable(_) => e,
                other => Error::LocationUnavailable(other.to_string()),
            })?;

        debug!(%coordinate, "Resolved device position");
        Ok(ResolvedLocation::new(self.current_label.clone(), coordinate))
    }

    /// Resolve a free-text place name to its best geocoding match.
    ///
    /// Empty or whitespace-only input fails with [`Error::InvalidQuery`]
    /// without any network call.
    pub async fn resolve_query(&self, query: &str) -> Result<ResolvedLocation> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidQuery);
        }

        let candidates = self.geocoding.search(trimmed, 1).await?;
        let Some(best) = candidates.into_iter().next() else {
            info!(query = trimmed, "No geocoding match");
            return Err(Error::not_found(trimmed));
        };

        let name = best.display_name();
        debug!(query = trimmed, %name, coordinate = %best.coordinate, "Resolved query");
        Ok(ResolvedLocation::new(name, best.coordinate))
    }
}
