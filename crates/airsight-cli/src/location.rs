//! Device position source for a terminal without location services.

use async_trait::async_trait;
use tracing::debug;

use airsight_core::{Coordinate, Error, GeolocationProvider, PermissionStatus, Result};

/// Reports a fixed, configured position. Without one, permission is denied.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredLocation {
    position: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub fn new(position: Option<Coordinate>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for ConfiguredLocation {
    async fn request_permission(&self) -> PermissionStatus {
        if self.position.is_some() {
            PermissionStatus::Granted
        } else {
            debug!("No position configured");
            PermissionStatus::Denied
        }
    }

    async fn current_position(&self) -> Result<Coordinate> {
        self.position
            .ok_or_else(|| Error::LocationUnavailable("no position configured".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_configured_position_is_granted() {
        let pos = Coordinate::new(59.91, 10.75).unwrap();
        let location = ConfiguredLocation::new(Some(pos));
        assert_eq!(location.request_permission().await, PermissionStatus::Granted);
        assert_eq!(location.current_position().await.unwrap(), pos);
    }

    #[tokio::test]
    async fn test_missing_position_is_denied() {
        let location = ConfiguredLocation::new(None);
        assert_eq!(location.request_permission().await, PermissionStatus::Denied);
    }
}
