use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use avida_types::api::{LoginRequest, RegisterExamRequest, RegisterVolunteerRequest, SignupRequest};
use avida_types::models::{UserType, VolunteerProfile};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::notify::{Notifier, Page};
use crate::session::Session;

pub const EXAM_SESSIONS: [&str; 3] = ["Morning", "Afternoon", "Evening"];

const DATE_FORMAT: &str = "%Y-%m-%d";

fn required(value: &str, label: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::validation(format!("{} is required.", label)));
    }
    Ok(value.to_string())
}

fn parse_date(value: &str, label: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ClientError::validation(format!("{} must be a date like 2025-03-10.", label)))
}

// -- Signup --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupField {
    FirstName,
    LastName,
    EmailId,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    first_name: String,
    last_name: String,
    email_id: String,
    password: String,
    confirm_password: String,
    user_type: Option<UserType>,
}

impl SignupForm {
    pub fn set(&mut self, field: SignupField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SignupField::FirstName => self.first_name = value,
            SignupField::LastName => self.last_name = value,
            SignupField::EmailId => self.email_id = value,
            SignupField::Password => self.password = value,
            SignupField::ConfirmPassword => self.confirm_password = value,
        }
    }

    pub fn set_user_type(&mut self, user_type: UserType) {
        self.user_type = Some(user_type);
    }

    pub fn validate(&self) -> Result<SignupRequest> {
        let first_name = required(&self.first_name, "First name")?;
        let last_name = required(&self.last_name, "Last name")?;
        let email_id = required(&self.email_id, "Email")?;
        if self.password.is_empty() {
            return Err(ClientError::validation("Password is required."));
        }
        if self.password != self.confirm_password {
            return Err(ClientError::validation("Passwords do not match!"));
        }
        let user_type = self
            .user_type
            .ok_or_else(|| ClientError::validation("Select whether you are a volunteer or a disabled user."))?;

        Ok(SignupRequest {
            first_name,
            last_name,
            email_id,
            password: self.password.clone(),
            user_type,
        })
    }
}

// -- Exam registration --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExamField {
    ExamName,
    ExamVenue,
    ExamSession,
    ExamDate,
    Qualification,
    Language,
    Gender,
}

#[derive(Debug, Clone)]
pub struct ExamForm {
    exam_name: String,
    exam_venue: String,
    exam_session: String,
    exam_date: String,
    qualification: String,
    language: String,
    gender: String,
}

impl Default for ExamForm {
    fn default() -> Self {
        Self {
            exam_name: String::new(),
            exam_venue: String::new(),
            exam_session: String::new(),
            exam_date: String::new(),
            qualification: String::new(),
            language: String::new(),
            gender: "Female".into(),
        }
    }
}

impl ExamForm {
    pub fn set(&mut self, field: ExamField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ExamField::ExamName => self.exam_name = value,
            ExamField::ExamVenue => self.exam_venue = value,
            ExamField::ExamSession => self.exam_session = value,
            ExamField::ExamDate => self.exam_date = value,
            ExamField::Qualification => self.qualification = value,
            ExamField::Language => self.language = value,
            ExamField::Gender => self.gender = value,
        }
    }

    pub fn validate(&self, user_id: &str) -> Result<RegisterExamRequest> {
        let exam_name = required(&self.exam_name, "Exam name")?;
        let exam_venue = required(&self.exam_venue, "Exam venue")?;
        let exam_session = required(&self.exam_session, "Exam session")?;
        if !EXAM_SESSIONS.contains(&exam_session.as_str()) {
            return Err(ClientError::validation(format!(
                "Exam session must be one of {}.",
                EXAM_SESSIONS.join(", ")
            )));
        }
        let exam_date = parse_date(&required(&self.exam_date, "Exam date")?, "Exam date")?;

        Ok(RegisterExamRequest {
            user_id: user_id.to_string(),
            exam_name,
            exam_venue,
            exam_session,
            exam_date,
            qualification_needed_for_volunteer: self.qualification.trim().to_string(),
            language_should_be_known_for_volunteer: self.language.trim().to_string(),
            gender: self.gender.trim().to_string(),
        })
    }
}

// -- Volunteer registration --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolunteerField {
    State,
    City,
    LanguagesKnown,
    Qualification,
    AvailableSession,
    PastExperience,
    TravelDistanceKm,
    AadharNumber,
    PanCardNumber,
}

#[derive(Debug, Clone)]
pub struct VolunteerForm {
    state: String,
    city: String,
    languages_known: String,
    qualification: String,
    available_session: String,
    past_experience: String,
    travel_distance_km: String,
    aadhar_number: String,
    pan_card_number: String,
    available_dates: Vec<String>,
    location: Option<(f64, f64)>,
}

impl Default for VolunteerForm {
    fn default() -> Self {
        Self {
            state: String::new(),
            city: String::new(),
            languages_known: String::new(),
            qualification: String::new(),
            available_session: String::new(),
            past_experience: "no".into(),
            travel_distance_km: String::new(),
            aadhar_number: String::new(),
            pan_card_number: String::new(),
            available_dates: Vec::new(),
            location: None,
        }
    }
}

impl VolunteerForm {
    pub fn set(&mut self, field: VolunteerField, value: impl Into<String>) {
        let value = value.into();
        match field {
            // Changing state invalidates the city
            VolunteerField::State => {
                self.state = value;
                self.city.clear();
            }
            VolunteerField::City => self.city = value,
            VolunteerField::LanguagesKnown => self.languages_known = value,
            VolunteerField::Qualification => self.qualification = value,
            VolunteerField::AvailableSession => self.available_session = value,
            VolunteerField::PastExperience => self.past_experience = value,
            VolunteerField::TravelDistanceKm => self.travel_distance_km = value,
            VolunteerField::AadharNumber => self.aadhar_number = value,
            VolunteerField::PanCardNumber => self.pan_card_number = value,
        }
    }

    /// Toggle a date in the availability list.
    pub fn toggle_available_date(&mut self, date: impl Into<String>) {
        let date = date.into();
        if let Some(pos) = self.available_dates.iter().position(|d| *d == date) {
            self.available_dates.remove(pos);
        } else {
            self.available_dates.push(date);
        }
    }

    pub fn set_location(&mut self, latitude: f64, longitude: f64) {
        self.location = Some((latitude, longitude));
    }

    pub fn validate(&self, user_id: &str) -> Result<RegisterVolunteerRequest> {
        let state = required(&self.state, "State")?;
        let city = required(&self.city, "City")?;
        let languages_known = required(&self.languages_known, "Languages known")?;
        if self.available_dates.is_empty() {
            return Err(ClientError::validation("Pick at least one available date."));
        }
        let mut available_dates = self
            .available_dates
            .iter()
            .map(|d| parse_date(d, "Available date"))
            .collect::<Result<Vec<_>>>()?;
        available_dates.sort();

        let travel_distance_km = match self.travel_distance_km.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(km) if km.is_finite() && km >= 0.0 => Some(km),
                _ => {
                    return Err(ClientError::validation(
                        "Travel distance must be a non-negative number of kilometres.",
                    ));
                }
            },
        };

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(RegisterVolunteerRequest {
            user_id: user_id.to_string(),
            state,
            city,
            languages_known,
            qualification: self.qualification.trim().to_string(),
            available_dates,
            available_session: self.available_session.trim().to_string(),
            past_experience: self.past_experience.trim().to_string(),
            travel_distance_km,
            aadhar_number: optional(&self.aadhar_number),
            pan_card_number: optional(&self.pan_card_number),
            location_coordinate_latitude: self.location.map(|(lat, _)| lat),
            location_coordinate_longitude: self.location.map(|(_, lon)| lon),
        })
    }
}

/// Signup, login, logout, registrations and profile lookups.
pub struct AccountFlow<A> {
    api: Arc<A>,
    page: Page,
}

impl<A: AvidaApi> AccountFlow<A> {
    pub fn new(api: Arc<A>, notifier: Notifier) -> Self {
        Self {
            api,
            page: Page::new(notifier),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.page.error()
    }

    pub async fn signup(&mut self, form: &SignupForm) -> Result<()> {
        let result: Result<()> = async {
            let req = form.validate()?;
            self.api.signup(&req).await
        }
        .await;
        self.page.settle(result)?;
        self.page.notifier().toast("Signup Successful!");
        Ok(())
    }

    pub async fn login(&mut self, email_id: &str, password: &str) -> Result<Session> {
        let result: Result<Session> = async {
            let email_id = required(email_id, "Email")?;
            if password.is_empty() {
                return Err(ClientError::validation("Password is required."));
            }
            let resp = self
                .api
                .login(&LoginRequest {
                    email_id,
                    password: password.to_string(),
                })
                .await?;
            Ok(Session::from(resp))
        }
        .await;
        let session = self.page.settle(result)?;
        info!("Logged in as {} ({})", session.user_id, session.user_type);
        self.page.notifier().toast("Login Successful!");
        Ok(session)
    }

    pub async fn logout(&mut self, session: &Session) -> Result<()> {
        let result = self.api.logout(session).await;
        self.page.settle(result)
    }

    pub async fn register_exam(&mut self, session: &Session, form: &ExamForm) -> Result<()> {
        let result: Result<()> = async {
            let req = form.validate(&session.user_id)?;
            self.api.register_exam(session, &req).await
        }
        .await;
        self.page.settle(result)?;
        self.page.notifier().toast("Exam registration is done!");
        Ok(())
    }

    pub async fn register_volunteer(&mut self, session: &Session, form: &VolunteerForm) -> Result<()> {
        let result: Result<()> = async {
            let req = form.validate(&session.user_id)?;
            self.api.register_volunteer(session, &req).await
        }
        .await;
        self.page.settle(result)?;
        self.page.notifier().toast("Volunteer registered successfully!");
        Ok(())
    }

    pub async fn volunteer_profile(&mut self, session: &Session) -> Result<VolunteerProfile> {
        let result = self.api.volunteer_profile(session).await;
        self.page.settle(result)
    }
}
