use crate::api::{ApiClient, ApiError, AttendanceRecord};

pub async fn fetch_records(api: &ApiClient) -> Result<Vec<AttendanceRecord>, ApiError> {
    api.view_attendance().await
}
