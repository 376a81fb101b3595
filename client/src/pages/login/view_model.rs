use std::sync::Arc;

use crate::api::{ApiClient, ApiError, LoginRequest};
use crate::device::{Camera, LocationProvider};
use crate::pages::login::repository;
use crate::pages::Notice;
use crate::router::{Navigator, Route};
use crate::state::Session;

pub struct LoginViewModel {
    api: ApiClient,
    camera: Arc<dyn Camera>,
    location: Arc<dyn LocationProvider>,
    pub email: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
    notices: Vec<Notice>,
}

impl LoginViewModel {
    pub fn new(api: ApiClient, camera: Arc<dyn Camera>, location: Arc<dyn LocationProvider>) -> Self {
        Self {
            api,
            camera,
            location,
            email: String::new(),
            password: String::new(),
            loading: false,
            error: None,
            notices: Vec::new(),
        }
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// One authentication exchange. On success the session is replaced
    /// wholesale, the runtime permissions are requested (denial is
    /// non-blocking), and the stack root becomes the dashboard.
    pub async fn submit(&mut self, nav: &mut Navigator) {
        if self.loading {
            return;
        }
        self.error = None;
        if self.email.is_empty() || self.password.is_empty() {
            self.error = Some("Please enter both email and password".into());
            return;
        }

        self.loading = true;
        let request = LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
        };
        let outcome = repository::login(&self.api, &request).await;
        self.loading = false;

        match outcome {
            Ok(response) => {
                if let (Some(access_token), Some(refresh_token)) =
                    (response.access_token, response.refresh_token)
                {
                    self.api.session().set(Session {
                        access_token,
                        refresh_token,
                        user: response.user,
                    });
                }
                self.request_runtime_permissions().await;
                self.notices.push(Notice::success("Welcome back!"));
                nav.reset(Route::Dashboard);
            }
            Err(ApiError::Server { message }) => {
                self.error = Some(message.clone());
                self.notices
                    .push(Notice::error("Login failed").with_detail(message));
            }
            Err(ApiError::Network) => {
                self.error =
                    Some("Network error. Please check your connection or server.".into());
            }
        }
    }

    /// The OS prompts happen here, right after login, so the user has
    /// already consented by the time the capture screen needs both.
    async fn request_runtime_permissions(&mut self) {
        if !self.camera.request_permission().await.is_granted() {
            self.notices.push(Notice::error("Camera permission denied"));
        }
        if !self.location.request_permission().await.is_granted() {
            self.notices.push(Notice::error("Location permission denied"));
        }
    }
}
