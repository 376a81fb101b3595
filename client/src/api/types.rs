use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::device::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Shape of a successful login body. Tokens are optional because the
/// service occasionally answers 2xx with an empty body; callers decide
/// what a usable session requires.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// User object as returned by the service. The login and profile
/// endpoints return different subsets, so everything is tolerant of
/// absence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub base_location: Option<String>,
}

/// Closed set of visit purposes accepted by the attendance endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Purpose {
    #[serde(rename = "Check In")]
    CheckIn,
    #[serde(rename = "Check Out")]
    CheckOut,
    #[serde(rename = "Site Visit")]
    SiteVisit,
    #[serde(rename = "Client Meeting")]
    ClientMeeting,
    #[serde(rename = "Office Visit")]
    OfficeVisit,
    #[serde(rename = "New Site Survey")]
    NewSiteSurvey,
    #[serde(rename = "Official Tour")]
    OfficialTour,
    #[serde(rename = "Others")]
    Others,
}

impl Purpose {
    pub const ALL: [Purpose; 8] = [
        Purpose::CheckIn,
        Purpose::CheckOut,
        Purpose::SiteVisit,
        Purpose::ClientMeeting,
        Purpose::OfficeVisit,
        Purpose::NewSiteSurvey,
        Purpose::OfficialTour,
        Purpose::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::CheckIn => "Check In",
            Purpose::CheckOut => "Check Out",
            Purpose::SiteVisit => "Site Visit",
            Purpose::ClientMeeting => "Client Meeting",
            Purpose::OfficeVisit => "Office Visit",
            Purpose::NewSiteSurvey => "New Site Survey",
            Purpose::OfficialTour => "Official Tour",
            Purpose::Others => "Others",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Purpose {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let wanted = input.trim();
        Purpose::ALL
            .iter()
            .find(|purpose| purpose.as_str().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| format!("unknown purpose: {}", input))
    }
}

/// Wire payload for one attendance submission. Built once per attempt
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubmission {
    pub image: String,
    pub location: String,
    pub location_name: String,
    pub purpose: Purpose,
    pub sub_purpose: String,
    pub feedback: String,
    pub timestamp: String,
    pub date: String,
}

impl AttendanceSubmission {
    /// Assembles the payload. `details` is mirrored into `subPurpose`
    /// and `feedback`; the backend expects both fields and expects them
    /// equal. Empty details submit as "N/A".
    pub fn new(
        image_data_uri: String,
        coords: Coordinates,
        purpose: Purpose,
        details: &str,
        taken_at: DateTime<Utc>,
    ) -> Self {
        let detail = if details.is_empty() {
            "N/A".to_string()
        } else {
            details.to_string()
        };
        let location = serde_json::json!({
            "lat": coords.latitude,
            "lng": coords.longitude,
        })
        .to_string();

        Self {
            image: image_data_uri,
            location,
            location_name: "Unknown".to_string(),
            purpose,
            sub_purpose: detail.clone(),
            feedback: detail,
            timestamp: taken_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            date: taken_at.format("%Y-%m-%d").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: i64,
    #[serde(default)]
    pub image: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub location_name: String,
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub sub_purpose: String,
    pub timestamp: DateTime<Utc>,
}

impl AttendanceRecord {
    /// Purpose plus the optional detail suffix, skipping the "N/A"
    /// placeholder.
    pub fn purpose_line(&self) -> String {
        if self.sub_purpose.is_empty() || self.sub_purpose == "N/A" {
            self.purpose.clone()
        } else {
            format!("{} • {}", self.purpose, self.sub_purpose)
        }
    }
}

/// Per-record travel distance as computed by the service. The server
/// reports either a number of kilometres or the literal string "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Km(f64),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceAnnotation {
    pub attendance_id: i64,
    pub distance: Distance,
    #[serde(default)]
    pub is_first: bool,
}

/// Failure taxonomy for remote calls. `Server` carries a ready-to-show
/// message (the server's text verbatim, or the endpoint fallback);
/// `Network` means no usable response arrived at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Server { message: String },
    #[error("Network error. Please try again.")]
    Network,
}

impl ApiError {
    pub fn server(message: impl Into<String>) -> Self {
        ApiError::Server {
            message: message.into(),
        }
    }
}
