use crate::api::{ApiClient, ApiError, UserProfile};
use crate::pages::profile::repository;
use crate::pages::{FetchGate, FetchTicket};
use crate::router::{Navigator, Route};
use crate::state::SessionStore;

/// Profile screen: always fetched fresh from the service, never served
/// from whatever the session happens to retain from login.
pub struct ProfileViewModel {
    api: ApiClient,
    session: SessionStore,
    pub user: Option<UserProfile>,
    pub loading: bool,
    pub error: Option<String>,
    gate: FetchGate,
}

impl ProfileViewModel {
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self {
            api,
            session,
            user: None,
            loading: false,
            error: None,
            gate: FetchGate::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let fetched = repository::fetch_profile(&self.api).await;
        self.apply_profile(ticket, fetched);
    }

    pub fn leave(&mut self) {
        self.gate.invalidate();
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .and_then(|user| user.full_name.clone())
            .unwrap_or_else(|| "User".to_string())
    }

    /// Labeled detail rows with a placeholder for absent values.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "—".to_string());
        match &self.user {
            Some(user) => vec![
                ("Organization", field(&user.organization)),
                ("Phone", field(&user.phone_number)),
                ("State", field(&user.state)),
                ("Base Location", field(&user.base_location)),
            ],
            None => Vec::new(),
        }
    }

    pub fn logout(&mut self, nav: &mut Navigator) {
        self.session.clear();
        nav.reset(Route::Login);
    }

    fn begin_load(&mut self) -> FetchTicket {
        self.loading = true;
        self.error = None;
        self.gate.open()
    }

    fn apply_profile(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Option<UserProfile>, ApiError>,
    ) {
        if !self.gate.admits(ticket) {
            return;
        }
        self.loading = false;
        match outcome {
            Ok(user) => self.user = user,
            Err(err) => self.error = Some(err.to_string()),
        }
    }
}
