use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account kind chosen at signup. Serialized exactly as the server stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Volunteer,
    Disabled,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Volunteer => f.write_str("Volunteer"),
            Self::Disabled => f.write_str("Disabled"),
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "volunteer" => Ok(Self::Volunteer),
            "disabled" => Ok(Self::Disabled),
            other => Err(format!("unknown user type '{}'", other)),
        }
    }
}

/// Name fields the server attaches when it populates a user reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

/// A reference to a user: either a bare id or a populated summary object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(String),
    Populated(UserSummary),
}

impl UserRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(summary) => &summary.id,
        }
    }

    /// "First Last" when the server populated the reference.
    pub fn display_name(&self) -> Option<String> {
        match self {
            Self::Id(_) => None,
            Self::Populated(summary) => {
                let name = [summary.first_name.as_deref(), summary.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                (!name.is_empty()).then_some(name)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(format!("unknown request status '{}'", other)),
        }
    }
}

/// A request from a disabled user to a volunteer.
/// Owned by the server; moves pending -> accepted | rejected exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub disabled_user_id: UserRef,
    pub volunteer_user_id: UserRef,
    pub status: RequestStatus,
}

impl ConnectionRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    pub fn is_accepted(&self) -> bool {
        self.status == RequestStatus::Accepted
    }

    /// The party on the other side of this request from `user_type`'s point of view.
    pub fn counterpart(&self, user_type: UserType) -> &UserRef {
        match user_type {
            UserType::Disabled => &self.volunteer_user_id,
            UserType::Volunteer => &self.disabled_user_id,
        }
    }
}

/// Exam record registered by a disabled user. Read-only once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamDetails {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub exam_name: String,
    pub exam_venue: String,
    pub exam_session: String,
    pub exam_date: DateTime<Utc>,
    #[serde(rename = "qualification_needed_for_volunteer", default)]
    pub qualification_needed_for_volunteer: String,
    #[serde(rename = "language_should_be_known_for_volunteer", default)]
    pub language_should_be_known_for_volunteer: String,
    #[serde(default)]
    pub gender: String,
}

/// Candidate row returned by the matching endpoint.
/// `volunteer_id` is the user id a connection request is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedVolunteer {
    #[serde(rename = "_id")]
    pub id: String,
    pub volunteer_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolunteerProfile {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserRef>,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(rename = "emailId", default)]
    pub email_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub languages_known: String,
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub past_experience: String,
    #[serde(default)]
    pub available_dates: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub available_session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_distance_km: Option<f64>,
}

/// A chat message. The server's copy is authoritative; clients never reorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sender: String,
    pub receiver: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_ref_accepts_bare_and_populated_forms() {
        let bare: UserRef = serde_json::from_str(r#""D3""#).unwrap();
        assert_eq!(bare.id(), "D3");
        assert_eq!(bare.display_name(), None);

        let populated: UserRef =
            serde_json::from_str(r#"{"_id":"V7","firstName":"Asha","lastName":"Rao"}"#).unwrap();
        assert_eq!(populated.id(), "V7");
        assert_eq!(populated.display_name().as_deref(), Some("Asha Rao"));
    }

    #[test]
    fn connection_request_decodes_server_shape() {
        let json = r#"{
            "_id": "R1",
            "disabledUserId": {"_id": "D3", "firstName": "Meena"},
            "volunteerUserId": "V7",
            "status": "pending",
            "__v": 0
        }"#;
        let req: ConnectionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.id, "R1");
        assert!(req.is_pending());
        assert_eq!(req.counterpart(UserType::Volunteer).id(), "D3");
        assert_eq!(req.counterpart(UserType::Disabled).id(), "V7");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let json = r#"{"_id":"R1","disabledUserId":"D3","volunteerUserId":"V7","status":"maybe"}"#;
        assert!(serde_json::from_str::<ConnectionRequest>(json).is_err());
    }

    #[test]
    fn exam_details_mixes_camel_and_snake_fields() {
        let json = r#"{
            "_id": "E42",
            "userId": {"_id": "D3"},
            "examName": "Board Exam",
            "examVenue": "Chennai",
            "examSession": "Morning",
            "examDate": "2025-03-10T00:00:00.000Z",
            "qualification_needed_for_volunteer": "12th",
            "language_should_be_known_for_volunteer": "Tamil",
            "gender": "Female"
        }"#;
        let exam: ExamDetails = serde_json::from_str(json).unwrap();
        assert_eq!(exam.id, "E42");
        assert_eq!(exam.user_id.as_ref().map(UserRef::id), Some("D3"));
        assert_eq!(exam.language_should_be_known_for_volunteer, "Tamil");
        assert_eq!(exam.exam_date.format("%Y-%m-%d").to_string(), "2025-03-10");
    }

    #[test]
    fn user_type_parses_case_insensitively() {
        assert_eq!("volunteer".parse::<UserType>().unwrap(), UserType::Volunteer);
        assert_eq!("Disabled".parse::<UserType>().unwrap(), UserType::Disabled);
        assert!("admin".parse::<UserType>().is_err());
    }
}
