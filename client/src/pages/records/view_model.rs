use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::api::{ApiClient, ApiError, AttendanceRecord, Distance, DistanceAnnotation};
use crate::pages::records::repository;
use crate::pages::{FetchGate, FetchTicket};
use crate::utils::time::utc_date_key;

/// Records screen: a two-phase fetch. Phase one pulls the whole history;
/// phase two asks the service for per-day travel distances and joins
/// them onto the records by id. The second phase is enrichment only and
/// its failures never surface to the user.
pub struct RecordsViewModel {
    api: ApiClient,
    pub records: Vec<AttendanceRecord>,
    pub distance_by_id: HashMap<i64, DistanceAnnotation>,
    pub loading: bool,
    pub error: Option<String>,
    gate: FetchGate,
}

/// One display row: the record plus its distance text, if any was
/// computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub record: AttendanceRecord,
    pub distance_label: Option<String>,
}

impl RecordsViewModel {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            records: Vec::new(),
            distance_by_id: HashMap::new(),
            loading: false,
            error: None,
            gate: FetchGate::default(),
        }
    }

    pub async fn load(&mut self) {
        let ticket = self.begin_load();
        let fetched = repository::fetch_records(&self.api).await;
        if !self.apply_records(ticket, fetched) {
            return;
        }
        if self.records.is_empty() {
            return;
        }

        let dates = distinct_date_keys(&self.records);
        let mut merged = HashMap::new();
        for date in dates {
            match repository::fetch_distances(&self.api, date).await {
                Ok(annotations) => {
                    // Each id appears in exactly one day's response, so
                    // last-write-wins merging is harmless.
                    for annotation in annotations {
                        merged.insert(annotation.attendance_id, annotation);
                    }
                }
                Err(err) => {
                    tracing::debug!(%date, error = %err, "distance enrichment failed");
                }
            }
        }
        self.apply_distances(ticket, merged);
    }

    /// Invalidate outstanding loads when the user navigates away, so a
    /// late response is discarded instead of applied.
    pub fn leave(&mut self) {
        self.gate.invalidate();
    }

    pub fn rows(&self) -> Vec<RecordRow> {
        self.records
            .iter()
            .map(|record| RecordRow {
                record: record.clone(),
                distance_label: self.distance_by_id.get(&record.id).map(distance_label),
            })
            .collect()
    }

    fn begin_load(&mut self) -> FetchTicket {
        self.loading = true;
        self.error = None;
        self.gate.open()
    }

    fn apply_records(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<Vec<AttendanceRecord>, ApiError>,
    ) -> bool {
        if !self.gate.admits(ticket) {
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(records) => {
                self.records = records;
                self.distance_by_id.clear();
                true
            }
            Err(err) => {
                self.records.clear();
                self.distance_by_id.clear();
                self.error = Some(err.to_string());
                false
            }
        }
    }

    fn apply_distances(&mut self, ticket: FetchTicket, merged: HashMap<i64, DistanceAnnotation>) {
        if !self.gate.admits(ticket) {
            return;
        }
        self.distance_by_id = merged;
    }
}

/// Distinct calendar days present in the history, in first-seen order.
/// One distance request is issued per entry, never more.
fn distinct_date_keys(records: &[AttendanceRecord]) -> Vec<NaiveDate> {
    let mut seen = HashSet::new();
    let mut dates = Vec::new();
    for record in records {
        let date = utc_date_key(record.timestamp);
        if seen.insert(date) {
            dates.push(date);
        }
    }
    dates
}

/// Display rule for a joined annotation. The first record of a day is a
/// fixed string no matter what number the server sent with it.
pub fn distance_label(annotation: &DistanceAnnotation) -> String {
    if annotation.is_first {
        return "0.00 km (first record)".to_string();
    }
    match &annotation.distance {
        Distance::Label(label) if label == "N/A" => "N/A".to_string(),
        Distance::Label(label) => format!("{} km", label),
        Distance::Km(value) => format!("{} km", value),
    }
}
