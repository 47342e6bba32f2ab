use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ConnectionRequest, Message, MatchedVolunteer, RequestStatus, UserType};

// -- Errors --

/// Error body the server sends alongside a non-2xx status.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

// -- Auth --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email_id: String,
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email_id: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_type: UserType,
    pub user_id: String,
}

// -- Registration --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterExamRequest {
    pub user_id: String,
    pub exam_name: String,
    pub exam_venue: String,
    pub exam_session: String,
    pub exam_date: NaiveDate,
    #[serde(rename = "qualification_needed_for_volunteer")]
    pub qualification_needed_for_volunteer: String,
    #[serde(rename = "language_should_be_known_for_volunteer")]
    pub language_should_be_known_for_volunteer: String,
    pub gender: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterVolunteerRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub state: String,
    pub city: String,
    pub languages_known: String,
    pub qualification: String,
    pub available_dates: Vec<NaiveDate>,
    pub available_session: String,
    pub past_experience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_distance_km: Option<f64>,
    #[serde(rename = "Aadhar_Number", default, skip_serializing_if = "Option::is_none")]
    pub aadhar_number: Option<String>,
    #[serde(rename = "Pan_Card_Number", default, skip_serializing_if = "Option::is_none")]
    pub pan_card_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_coordinate_latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_coordinate_longitude: Option<f64>,
}

// -- Matching --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    #[serde(default)]
    pub matched_volunteers: Vec<MatchedVolunteer>,
}

/// Acknowledgement for a sent connection request. Both fields are optional
/// because the server may answer with an empty body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendRequestResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub request: Option<ConnectionRequest>,
}

// -- Connection requests --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequestsResponse {
    #[serde(default)]
    pub pending_requests: Vec<ConnectionRequest>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DisabledRequestsResponse {
    #[serde(default)]
    pub requests: Vec<ConnectionRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondRequest {
    pub status: RequestStatus,
}

// -- Messages --

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendMessageRequest {
    pub connection_id: String,
    pub sender: String,
    pub receiver: String,
    pub content: String,
}
