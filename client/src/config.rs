use std::env;

/// Hosted WorkTrack backend used when no override is supplied.
pub const DEFAULT_API_BASE_URL: &str = "https://backend-sql-9ck0.onrender.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
}

impl Config {
    pub fn load() -> Self {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("WORKTRACK_API_BASE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Self {
            api_base_url: normalize_base_url(api_base_url),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: normalize_base_url(base_url.into()),
        }
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
