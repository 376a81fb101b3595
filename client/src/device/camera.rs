use std::path::PathBuf;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::utils::image::{encode_jpeg, fit_within};

use super::{DeviceError, PermissionStatus};

/// Capture-time bounds. The upload pass shrinks the image further; this
/// pass only keeps the in-memory copy small.
pub const CAPTURE_MAX_WIDTH: u32 = 800;
pub const CAPTURE_MAX_HEIGHT: u32 = 600;
pub const CAPTURE_JPEG_QUALITY: u8 = 30;

/// One captured selfie: a reference to the source plus the reduced JPEG
/// inlined as base64 (no data-URI prefix). Replaced on retake, dropped
/// after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub uri: String,
    pub base64: String,
}

#[async_trait]
pub trait Camera: Send + Sync {
    async fn permission(&self) -> PermissionStatus;
    async fn request_permission(&self) -> PermissionStatus;
    async fn take_picture(&self) -> Result<CapturedPhoto, DeviceError>;
}

/// Camera backed by an image file on disk, the headless stand-in for the
/// front camera. Each capture re-reads the file and applies the same
/// reduction a device capture would: fit within 800x600, mirror
/// horizontally, re-encode as a low-quality JPEG.
#[derive(Debug, Clone)]
pub struct FileCamera {
    source: Option<PathBuf>,
}

impl FileCamera {
    pub fn new(source: Option<PathBuf>) -> Self {
        Self { source }
    }

    fn status(&self) -> PermissionStatus {
        if self.source.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn permission(&self) -> PermissionStatus {
        self.status()
    }

    async fn request_permission(&self) -> PermissionStatus {
        self.status()
    }

    async fn take_picture(&self) -> Result<CapturedPhoto, DeviceError> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| DeviceError::Camera("no camera source configured".into()))?;

        let bytes = tokio::fs::read(source)
            .await
            .map_err(|err| DeviceError::Camera(err.to_string()))?;
        let image =
            image::load_from_memory(&bytes).map_err(|err| DeviceError::Camera(err.to_string()))?;

        let reduced = fit_within(image, CAPTURE_MAX_WIDTH, CAPTURE_MAX_HEIGHT).fliph();
        let jpeg = encode_jpeg(&reduced, CAPTURE_JPEG_QUALITY)
            .map_err(|err| DeviceError::Camera(err.to_string()))?;

        Ok(CapturedPhoto {
            uri: source.display().to_string(),
            base64: STANDARD.encode(jpeg),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};
    use std::io::Write;

    fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            image::Rgb([120, 140, 160]),
        ));
        encode_jpeg(&image, 80).unwrap()
    }

    #[tokio::test]
    async fn capture_reduces_to_the_device_bounds() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&jpeg_fixture(1600, 900)).unwrap();

        let camera = FileCamera::new(Some(file.path().to_path_buf()));
        assert!(camera.permission().await.is_granted());

        let photo = camera.take_picture().await.unwrap();
        let bytes = STANDARD.decode(&photo.base64).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.width() <= CAPTURE_MAX_WIDTH);
        assert!(decoded.height() <= CAPTURE_MAX_HEIGHT);
    }

    #[tokio::test]
    async fn small_captures_are_not_upscaled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&jpeg_fixture(320, 240)).unwrap();

        let camera = FileCamera::new(Some(file.path().to_path_buf()));
        let photo = camera.take_picture().await.unwrap();
        let bytes = STANDARD.decode(&photo.base64).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
    }

    #[tokio::test]
    async fn missing_source_denies_permission() {
        let camera = FileCamera::new(None);
        assert_eq!(camera.permission().await, PermissionStatus::Denied);
        assert!(camera.take_picture().await.is_err());
    }

    #[tokio::test]
    async fn unreadable_source_is_a_camera_error() {
        let camera = FileCamera::new(Some(PathBuf::from("/nonexistent/selfie.jpg")));
        let error = camera.take_picture().await.unwrap_err();
        assert!(matches!(error, DeviceError::Camera(_)));
    }
}
