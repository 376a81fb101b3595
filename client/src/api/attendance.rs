use chrono::NaiveDate;
use serde_json::{json, Value};

use super::client::{body_reports_failure, server_message, ApiClient};
use super::types::{ApiError, AttendanceRecord, AttendanceSubmission, DistanceAnnotation};

impl ApiClient {
    pub async fn view_attendance(&self) -> Result<Vec<AttendanceRecord>, ApiError> {
        let response = self
            .http_client()
            .get(self.endpoint("/api/v1/user/viewAttendance"))
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "viewAttendance request failed");
                ApiError::Network
            })?;

        let status = response.status();
        let body = Self::strict_body(response).await?;
        if !status.is_success() || body_reports_failure(&body) {
            return Err(ApiError::server(server_message(
                &body,
                "Failed to fetch records",
            )));
        }

        // A missing or non-array `data` field is an empty history, not an
        // error.
        Ok(body
            .get("data")
            .cloned()
            .and_then(|data| serde_json::from_value(data).ok())
            .unwrap_or_default())
    }

    pub async fn submit_attendance(
        &self,
        submission: &AttendanceSubmission,
    ) -> Result<(), ApiError> {
        let response = self
            .http_client()
            .post(self.endpoint("/api/v1/user/attendance"))
            .headers(self.auth_headers())
            .json(submission)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "attendance submission failed");
                ApiError::Network
            })?;

        let status = response.status();
        let body = Self::lenient_body(response).await;
        if !status.is_success() || body_reports_failure(&body) {
            return Err(ApiError::server(server_message(&body, "Attendance failed")));
        }

        Ok(())
    }

    /// Point-to-point distances for one calendar day. Unlike the other
    /// endpoints this one needs an explicit `success: true` before its
    /// entries are usable; malformed entries are dropped one by one.
    pub async fn calculate_distance(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DistanceAnnotation>, ApiError> {
        let response = self
            .http_client()
            .post(self.endpoint("/api/v1/user/calculateDistance"))
            .headers(self.auth_headers())
            .json(&json!({ "date": date.format("%Y-%m-%d").to_string() }))
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "calculateDistance request failed");
                ApiError::Network
            })?;

        let status = response.status();
        let body = Self::lenient_body(response).await;
        if !status.is_success() || !matches!(body.get("success"), Some(Value::Bool(true))) {
            return Err(ApiError::server(server_message(
                &body,
                "Failed to compute distances",
            )));
        }

        let annotations = body
            .get("pointToPointDistances")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Ok(annotations)
    }
}
