pub mod camera;
pub mod location;

pub use camera::{Camera, CapturedPhoto, FileCamera};
pub use location::{Coordinates, LocationProvider, ManualLocation};

/// Result of querying or requesting an OS-level capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("camera failure: {0}")]
    Camera(String),
    #[error("location failure: {0}")]
    Location(String),
}
