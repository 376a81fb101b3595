use super::client::{body_reports_failure, server_message, ApiClient};
use super::types::{ApiError, UserProfile};

impl ApiClient {
    pub async fn get_me(&self) -> Result<Option<UserProfile>, ApiError> {
        let response = self
            .http_client()
            .get(self.endpoint("/api/v1/user/me"))
            .headers(self.auth_headers())
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "profile request failed");
                ApiError::Network
            })?;

        let status = response.status();
        let body = Self::strict_body(response).await?;
        if !status.is_success() || body_reports_failure(&body) {
            return Err(ApiError::server(server_message(
                &body,
                "Failed to load profile",
            )));
        }

        Ok(body
            .get("user")
            .cloned()
            .and_then(|user| serde_json::from_value(user).ok()))
    }
}
