use async_trait::async_trait;

use super::{DeviceError, PermissionStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Source of position fixes. `permission` queries the current status
/// without prompting; `request_permission` is the prompting variant and
/// is only called right after login.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn permission(&self) -> PermissionStatus;
    async fn request_permission(&self) -> PermissionStatus;
    async fn current_position(&self) -> Result<Coordinates, DeviceError>;
}

/// Position source backed by operator-supplied coordinates. This is the
/// headless stand-in for a GPS receiver: the shell passes the fix on the
/// command line and every sample returns it.
#[derive(Debug, Clone)]
pub struct ManualLocation {
    coords: Option<Coordinates>,
}

impl ManualLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }

    fn status(&self) -> PermissionStatus {
        if self.coords.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

#[async_trait]
impl LocationProvider for ManualLocation {
    async fn permission(&self) -> PermissionStatus {
        self.status()
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.status()
    }

    async fn current_position(&self) -> Result<Coordinates, DeviceError> {
        self.coords
            .ok_or_else(|| DeviceError::Location("no position source configured".into()))
    }
}
