use chrono::NaiveDate;

use crate::api::{ApiClient, ApiError, AttendanceRecord, DistanceAnnotation};

pub async fn fetch_records(api: &ApiClient) -> Result<Vec<AttendanceRecord>, ApiError> {
    api.view_attendance().await
}

pub async fn fetch_distances(
    api: &ApiClient,
    date: NaiveDate,
) -> Result<Vec<DistanceAnnotation>, ApiError> {
    api.calculate_distance(date).await
}
