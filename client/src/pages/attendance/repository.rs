use crate::api::{ApiClient, ApiError, AttendanceSubmission};

pub async fn submit_attendance(
    api: &ApiClient,
    submission: &AttendanceSubmission,
) -> Result<(), ApiError> {
    api.submit_attendance(submission).await
}
