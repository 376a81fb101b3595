use super::client::{body_reports_failure, server_message, ApiClient};
use super::types::{ApiError, LoginRequest, LoginResponse};

impl ApiClient {
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let response = self
            .http_client()
            .post(self.endpoint("/api/v1/user/login"))
            .json(request)
            .send()
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "login request failed");
                ApiError::Network
            })?;

        let status = response.status();
        let body = Self::lenient_body(response).await;
        if !status.is_success() || body_reports_failure(&body) {
            return Err(ApiError::server(server_message(
                &body,
                "Login failed. Please try again.",
            )));
        }

        Ok(serde_json::from_value(body).unwrap_or_default())
    }
}
