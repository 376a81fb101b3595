use chrono::{DateTime, NaiveDate, Utc};

/// Calendar day a record belongs to. Date keys are always derived from
/// the UTC instant, matching what the service stores.
pub fn utc_date_key(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
