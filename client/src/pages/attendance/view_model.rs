use std::sync::Arc;

use chrono::Utc;

use crate::api::{ApiClient, ApiError, AttendanceSubmission, Purpose};
use crate::device::{Camera, CapturedPhoto, Coordinates, LocationProvider, PermissionStatus};
use crate::pages::attendance::{repository, AttendanceForm};
use crate::pages::Notice;
use crate::router::{Navigator, Route};
use crate::utils::image::transcode_to_data_uri;

/// Capture screen state machine: permission check, selfie capture,
/// purpose selection, then one authenticated submission. Every attempt
/// is a single linear sequence; the `capturing`/`submitting` flags
/// mirror the disabled controls while a step is in flight.
pub struct AttendanceViewModel {
    api: ApiClient,
    camera: Arc<dyn Camera>,
    location: Arc<dyn LocationProvider>,
    pub camera_permission: PermissionStatus,
    pub location_permission: PermissionStatus,
    pub photo: Option<CapturedPhoto>,
    pub coords: Option<Coordinates>,
    pub form: AttendanceForm,
    pub capturing: bool,
    pub submitting: bool,
    notices: Vec<Notice>,
}

impl AttendanceViewModel {
    pub fn new(
        api: ApiClient,
        camera: Arc<dyn Camera>,
        location: Arc<dyn LocationProvider>,
    ) -> Self {
        Self {
            api,
            camera,
            location,
            camera_permission: PermissionStatus::Undetermined,
            location_permission: PermissionStatus::Undetermined,
            photo: None,
            coords: None,
            form: AttendanceForm::default(),
            capturing: false,
            submitting: false,
            notices: Vec::new(),
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The OS prompts already happened at login; entering the screen
    /// only queries the current status and takes one eager fix.
    pub async fn enter(&mut self) {
        self.camera_permission = self.camera.permission().await;
        self.location_permission = self.location.permission().await;
        if self.location_permission.is_granted() {
            if let Ok(fix) = self.location.current_position().await {
                self.coords = Some(fix);
            }
        }
    }

    pub fn camera_blocked(&self) -> bool {
        self.camera_permission == PermissionStatus::Denied
    }

    pub async fn capture_selfie(&mut self) {
        if self.capturing || !self.camera_permission.is_granted() {
            return;
        }
        self.capturing = true;
        match self.camera.take_picture().await {
            Ok(photo) => {
                self.photo = Some(photo);
                // Refresh the fix so the submission carries capture-time
                // coordinates; a failed sample is not fatal.
                if self.location_permission.is_granted() {
                    match self.location.current_position().await {
                        Ok(fix) => self.coords = Some(fix),
                        Err(err) => {
                            tracing::debug!(error = %err, "location refresh after capture failed")
                        }
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "selfie capture failed");
                self.notices
                    .push(Notice::error("Camera error").with_detail("Unable to capture photo."));
            }
        }
        self.capturing = false;
    }

    pub fn retake(&mut self) {
        self.photo = None;
    }

    /// Validates locally first; an attempt missing its photo, fix, or
    /// purpose makes no network call at all. On success the photo is
    /// discarded and the records screen takes over; no local record is
    /// synthesized.
    pub async fn submit(&mut self, nav: &mut Navigator) {
        if self.submitting {
            return;
        }
        let Some(photo) = self.photo.clone() else {
            self.notices
                .push(Notice::error("Missing selfie").with_detail("Please capture your selfie."));
            return;
        };
        let Some(coords) = self.coords else {
            self.notices
                .push(Notice::error("Location required").with_detail("Enable location to continue."));
            return;
        };
        let Some(purpose) = self.form.purpose else {
            self.notices
                .push(Notice::error("Select purpose").with_detail("Please choose a purpose."));
            return;
        };
        if self.form.details_overflow() {
            self.notices.push(
                Notice::error("Details too long")
                    .with_detail("Keep details to 50 characters or fewer."),
            );
            return;
        }

        self.submitting = true;
        let outcome = self.perform_submission(&photo, coords, purpose).await;
        self.submitting = false;

        match outcome {
            Ok(()) => {
                self.notices.push(Notice::success("Attendance marked"));
                self.photo = None;
                nav.navigate(Route::AttendanceRecords);
            }
            Err(notice) => self.notices.push(notice),
        }
    }

    async fn perform_submission(
        &self,
        photo: &CapturedPhoto,
        coords: Coordinates,
        purpose: Purpose,
    ) -> Result<(), Notice> {
        let image = transcode_to_data_uri(&photo.base64).map_err(|err| {
            tracing::warn!(error = %err, "selfie transcoding failed");
            Notice::error("Image processing failed").with_detail("Please retake your selfie.")
        })?;

        let submission =
            AttendanceSubmission::new(image, coords, purpose, &self.form.details, Utc::now());
        repository::submit_attendance(&self.api, &submission)
            .await
            .map_err(|err| match err {
                ApiError::Server { message } => Notice::error("Error").with_detail(message),
                ApiError::Network => {
                    Notice::error("Network error").with_detail("Please try again.")
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{FileCamera, ManualLocation};
    use crate::state::{Session, SessionStore};
    use crate::utils::image::encode_jpeg;
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use httpmock::prelude::*;
    use image::{DynamicImage, RgbImage};
    use serde_json::json;
    use std::io::Write;
    use std::path::PathBuf;

    fn selfie_file() -> tempfile::NamedTempFile {
        let image =
            DynamicImage::ImageRgb8(RgbImage::from_pixel(1024, 768, image::Rgb([200, 180, 160])));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&encode_jpeg(&image, 80).unwrap()).unwrap();
        file
    }

    fn fix() -> Coordinates {
        Coordinates {
            latitude: 12.9716,
            longitude: 77.5946,
        }
    }

    fn api_client(server: &MockServer) -> ApiClient {
        let session = SessionStore::new();
        session.set(Session {
            access_token: "t1".into(),
            refresh_token: "t2".into(),
            user: None,
        });
        ApiClient::new_with_base_url(server.base_url(), session)
    }

    fn view_model(
        api: ApiClient,
        camera_source: Option<PathBuf>,
        coords: Option<Coordinates>,
    ) -> AttendanceViewModel {
        AttendanceViewModel::new(
            api,
            Arc::new(FileCamera::new(camera_source)),
            Arc::new(ManualLocation::new(coords)),
        )
    }

    fn nav_on_attendance() -> Navigator {
        let mut nav = Navigator::new();
        nav.reset(Route::Dashboard);
        nav.navigate(Route::Attendance);
        nav
    }

    fn submit_mock(server: &MockServer) -> httpmock::Mock<'_> {
        server.mock(|when, then| {
            when.method(POST).path("/api/v1/user/attendance");
            then.status(200).json_body(json!({ "success": true }));
        })
    }

    #[tokio::test]
    async fn missing_photo_blocks_submission_locally() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let mut vm = view_model(api_client(&server), None, Some(fix()));
        let mut nav = nav_on_attendance();

        vm.coords = Some(fix());
        vm.form.select_purpose(Purpose::CheckIn);
        vm.submit(&mut nav).await;

        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Missing selfie");
        assert_eq!(notices[0].detail.as_deref(), Some("Please capture your selfie."));
        assert_eq!(mock.hits_async().await, 0);
        assert_eq!(nav.current(), Route::Attendance);
    }

    #[tokio::test]
    async fn missing_coordinates_block_submission_locally() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            None,
        );
        let mut nav = nav_on_attendance();

        vm.enter().await;
        vm.capture_selfie().await;
        assert!(vm.photo.is_some());
        vm.form.select_purpose(Purpose::CheckIn);
        vm.submit(&mut nav).await;

        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Location required");
        assert_eq!(notices[0].detail.as_deref(), Some("Enable location to continue."));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn missing_purpose_blocks_submission_locally() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            Some(fix()),
        );
        let mut nav = nav_on_attendance();

        vm.enter().await;
        vm.capture_selfie().await;
        vm.submit(&mut nav).await;

        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Select purpose");
        assert_eq!(notices[0].detail.as_deref(), Some("Please choose a purpose."));
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn overlong_details_block_submission_locally() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            Some(fix()),
        );
        let mut nav = nav_on_attendance();

        vm.enter().await;
        vm.capture_selfie().await;
        vm.form.select_purpose(Purpose::Others);
        vm.form.set_details("x".repeat(51));
        vm.submit(&mut nav).await;

        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Details too long");
        assert_eq!(mock.hits_async().await, 0);
    }

    #[tokio::test]
    async fn successful_submission_clears_photo_and_navigates_once() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            Some(fix()),
        );
        let mut nav = nav_on_attendance();

        vm.enter().await;
        assert!(vm.coords.is_some());
        vm.capture_selfie().await;
        vm.form.select_purpose(Purpose::SiteVisit);
        vm.form.set_details("site walkthrough");
        vm.submit(&mut nav).await;

        assert_eq!(mock.hits_async().await, 1);
        assert!(vm.photo.is_none());
        assert_eq!(nav.current(), Route::AttendanceRecords);
        let depth = nav.depth();
        let notices = vm.drain_notices();
        assert!(notices.contains(&Notice::success("Attendance marked")));

        // A second submit is a fresh attempt; the photo is gone, so it
        // fails locally without touching the network or the stack.
        vm.submit(&mut nav).await;
        assert_eq!(mock.hits_async().await, 1);
        assert_eq!(nav.depth(), depth);
    }

    #[tokio::test]
    async fn camera_failure_keeps_prior_state() {
        let server = MockServer::start_async().await;
        let mut vm = view_model(
            api_client(&server),
            Some(PathBuf::from("/nonexistent/selfie.jpg")),
            Some(fix()),
        );

        vm.enter().await;
        assert!(vm.camera_permission.is_granted());
        vm.capture_selfie().await;

        assert!(vm.photo.is_none());
        assert!(!vm.capturing);
        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Camera error");
        assert_eq!(notices[0].detail.as_deref(), Some("Unable to capture photo."));
    }

    #[tokio::test]
    async fn blocked_camera_ignores_capture_requests() {
        let server = MockServer::start_async().await;
        let mut vm = view_model(api_client(&server), None, Some(fix()));

        vm.enter().await;
        assert!(vm.camera_blocked());
        vm.capture_selfie().await;

        assert!(vm.photo.is_none());
        assert!(vm.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn transcode_failure_aborts_before_the_network() {
        let server = MockServer::start_async().await;
        let mock = submit_mock(&server);
        let mut vm = view_model(api_client(&server), None, Some(fix()));
        let mut nav = nav_on_attendance();

        vm.photo = Some(CapturedPhoto {
            uri: "capture-1".into(),
            base64: STANDARD.encode(b"not a jpeg"),
        });
        vm.coords = Some(fix());
        vm.form.select_purpose(Purpose::CheckOut);
        vm.submit(&mut nav).await;

        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Image processing failed");
        assert_eq!(mock.hits_async().await, 0);
        assert!(vm.photo.is_some());
        assert_eq!(nav.current(), Route::Attendance);
    }

    #[tokio::test]
    async fn server_rejection_shows_message_and_keeps_photo() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/v1/user/attendance");
            then.status(400)
                .json_body(json!({ "success": false, "message": "Outside geofence" }));
        });
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            Some(fix()),
        );
        let mut nav = nav_on_attendance();

        vm.enter().await;
        vm.capture_selfie().await;
        vm.form.select_purpose(Purpose::ClientMeeting);
        vm.submit(&mut nav).await;

        assert_eq!(mock.hits_async().await, 1);
        let notices = vm.drain_notices();
        assert_eq!(notices[0].title, "Error");
        assert_eq!(notices[0].detail.as_deref(), Some("Outside geofence"));
        assert!(vm.photo.is_some());
        assert_eq!(nav.current(), Route::Attendance);
    }

    #[tokio::test]
    async fn retake_discards_the_photo() {
        let server = MockServer::start_async().await;
        let selfie = selfie_file();
        let mut vm = view_model(
            api_client(&server),
            Some(selfie.path().to_path_buf()),
            Some(fix()),
        );

        vm.enter().await;
        vm.capture_selfie().await;
        assert!(vm.photo.is_some());
        vm.retake();
        assert!(vm.photo.is_none());
    }
}
