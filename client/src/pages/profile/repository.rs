use crate::api::{ApiClient, ApiError, UserProfile};

pub async fn fetch_profile(api: &ApiClient) -> Result<Option<UserProfile>, ApiError> {
    api.get_me().await
}
