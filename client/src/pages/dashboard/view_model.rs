use chrono::{Duration, NaiveDate};

use crate::api::{ApiClient, AttendanceRecord};
use crate::pages::dashboard::repository;
use crate::pages::{FetchGate, FetchTicket};
use crate::router::{Navigator, Route};
use crate::state::SessionStore;
use crate::utils::time::{today_utc, utc_date_key};

/// Home screen: the full history fetched once per activation, browsed
/// one day at a time.
pub struct DashboardViewModel {
    api: ApiClient,
    session: SessionStore,
    pub records: Vec<AttendanceRecord>,
    pub selected_date: NaiveDate,
    pub loading: bool,
    pub error: Option<String>,
    gate: FetchGate,
}

impl DashboardViewModel {
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        Self {
            api,
            session,
            records: Vec::new(),
            selected_date: today_utc(),
            loading: false,
            error: None,
            gate: FetchGate::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let fetched = repository::fetch_records(&self.api).await;
        self.apply_records(ticket, fetched);
    }

    pub fn leave(&mut self) {
        self.gate.invalidate();
    }

    pub fn greeting(&self) -> String {
        match self.session.get().user.and_then(|user| user.name) {
            Some(name) => format!("Welcome, {}", name),
            None => "Welcome".to_string(),
        }
    }

    pub fn daily_records(&self) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|record| utc_date_key(record.timestamp) == self.selected_date)
            .collect()
    }

    pub fn change_day(&mut self, delta: i64) {
        self.selected_date = self.selected_date + Duration::days(delta);
    }

    pub fn select_today(&mut self) {
        self.selected_date = today_utc();
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

    fn apply_records(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<AttendanceRecord>, crate::api::ApiError>,
    ) {
        if !self.gate.admits(ticket) {
            return;
        }
        self.loading = false;
        match outcome {
            Ok(records) => self.records = records,
            Err(err) => {
                self.records.clear();
                self.error = Some(err.to_string());
            }
        }
    }
}
