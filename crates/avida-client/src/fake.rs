//! In-memory stand-in for the Avida backend, used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use avida_types::api::{
    LoginRequest, LoginResponse, RegisterExamRequest, RegisterVolunteerRequest,
    SendMessageRequest, SendRequestResponse, SignupRequest,
};
use avida_types::models::{
    ConnectionRequest, ExamDetails, MatchedVolunteer, Message, RequestStatus, UserRef, UserType,
    VolunteerProfile,
};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::session::Session;

pub(crate) fn disabled_session(user_id: &str) -> Session {
    Session {
        token: format!("token-{}", user_id),
        user_id: user_id.into(),
        user_type: UserType::Disabled,
    }
}

pub(crate) fn volunteer_session(user_id: &str) -> Session {
    Session {
        token: format!("token-{}", user_id),
        user_id: user_id.into(),
        user_type: UserType::Volunteer,
    }
}

struct FakeUser {
    id: String,
    email_id: String,
    password: String,
    user_type: UserType,
}

#[derive(Default)]
struct FakeState {
    users: Vec<FakeUser>,
    exams: HashMap<String, ExamDetails>,
    candidates: Vec<MatchedVolunteer>,
    profiles: HashMap<String, VolunteerProfile>,
    /// (exam id, request)
    requests: Vec<(Option<String>, ConnectionRequest)>,
    messages: Vec<Message>,
    calls: Vec<&'static str>,
    failing: HashSet<&'static str>,
    next_id: u32,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
    history_gate: Mutex<Option<Arc<Notify>>>,
}

fn not_found(what: &str) -> ClientError {
    ClientError::Http {
        status: 404,
        message: format!("{} not found", what),
    }
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_user(&self, id: &str, email_id: &str, password: &str, user_type: UserType) {
        self.state.lock().unwrap().users.push(FakeUser {
            id: id.into(),
            email_id: email_id.into(),
            password: password.into(),
            user_type,
        });
    }

    pub(crate) fn add_exam(&self, user_id: &str, exam_id: &str) {
        let exam = ExamDetails {
            id: exam_id.into(),
            user_id: Some(UserRef::Id(user_id.into())),
            first_name: None,
            last_name: None,
            exam_name: "Board Exam".into(),
            exam_venue: "Chennai".into(),
            exam_session: "Morning".into(),
            exam_date: chrono::DateTime::parse_from_rfc3339("2025-03-10T00:00:00Z")
                .unwrap()
                .to_utc(),
            qualification_needed_for_volunteer: "12th".into(),
            language_should_be_known_for_volunteer: "Tamil".into(),
            gender: "Female".into(),
        };
        self.state.lock().unwrap().exams.insert(user_id.into(), exam);
    }

    pub(crate) fn add_candidate(&self, volunteer_id: &str, first_name: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("M");
        state.candidates.push(MatchedVolunteer {
            id,
            volunteer_id: volunteer_id.into(),
            first_name: first_name.into(),
            last_name: None,
        });
    }

    pub(crate) fn add_request(&self, id: &str, disabled: &str, volunteer: &str, status: RequestStatus) {
        self.state.lock().unwrap().requests.push((
            None,
            ConnectionRequest {
                id: id.into(),
                disabled_user_id: UserRef::Id(disabled.into()),
                volunteer_user_id: UserRef::Id(volunteer.into()),
                status,
            },
        ));
    }

    pub(crate) fn fail_on(&self, op: &'static str) {
        self.state.lock().unwrap().failing.insert(op);
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.state.lock().unwrap().calls.iter().filter(|c| **c == op).count()
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    /// Server-side view of a request and the exam it was sent for.
    pub(crate) fn stored_request(&self, id: &str) -> Option<(Option<String>, ConnectionRequest)> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|(_, r)| r.id == id)
            .cloned()
    }

    pub(crate) fn requests_for(&self, volunteer: &str) -> Vec<(Option<String>, ConnectionRequest)> {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(_, r)| r.volunteer_user_id.id() == volunteer)
            .cloned()
            .collect()
    }

    pub(crate) fn push_message(&self, connection_id: &str, sender: &str, receiver: &str, content: &str) {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("MSG");
        state.messages.push(Message {
            id: Some(id),
            sender: sender.into(),
            receiver: receiver.into(),
            content: content.into(),
            connection_id: Some(connection_id.into()),
            created_at: None,
        });
    }

    /// Hold every history fetch, after its snapshot is taken, until the
    /// returned handle is notified.
    pub(crate) fn gate_history(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.history_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub(crate) fn gate_release(&self) {
        *self.history_gate.lock().unwrap() = None;
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        if state.failing.contains(op) {
            return Err(ClientError::Http {
                status: 500,
                message: format!("Failed to {}.", op.replace('_', " ")),
            });
        }
        Ok(())
    }
}

impl AvidaApi for FakeApi {
    async fn signup(&self, req: &SignupRequest) -> Result<()> {
        self.enter("signup")?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("U");
        state.users.push(FakeUser {
            id,
            email_id: req.email_id.clone(),
            password: req.password.clone(),
            user_type: req.user_type,
        });
        Ok(())
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        self.enter("login")?;
        let state = self.state.lock().unwrap();
        state
            .users
            .iter()
            .find(|u| u.email_id == req.email_id && u.password == req.password)
            .map(|u| LoginResponse {
                token: format!("token-{}", u.id),
                user_type: u.user_type,
                user_id: u.id.clone(),
            })
            .ok_or(ClientError::Http {
                status: 401,
                message: "Invalid credentials".into(),
            })
    }

    async fn logout(&self, _session: &Session) -> Result<()> {
        self.enter("logout")
    }

    async fn register_exam(&self, _session: &Session, req: &RegisterExamRequest) -> Result<()> {
        self.enter("register_exam")?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("E");
        let exam = ExamDetails {
            id,
            user_id: Some(UserRef::Id(req.user_id.clone())),
            first_name: None,
            last_name: None,
            exam_name: req.exam_name.clone(),
            exam_venue: req.exam_venue.clone(),
            exam_session: req.exam_session.clone(),
            exam_date: req.exam_date.and_hms_opt(0, 0, 0).unwrap().and_utc(),
            qualification_needed_for_volunteer: req.qualification_needed_for_volunteer.clone(),
            language_should_be_known_for_volunteer: req
                .language_should_be_known_for_volunteer
                .clone(),
            gender: req.gender.clone(),
        };
        state.exams.insert(req.user_id.clone(), exam);
        Ok(())
    }

    async fn register_volunteer(&self, _session: &Session, req: &RegisterVolunteerRequest) -> Result<()> {
        self.enter("register_volunteer")?;
        let profile = VolunteerProfile {
            user_id: Some(UserRef::Id(req.user_id.clone())),
            state: req.state.clone(),
            city: req.city.clone(),
            languages_known: req.languages_known.clone(),
            qualification: req.qualification.clone(),
            past_experience: req.past_experience.clone(),
            available_dates: req
                .available_dates
                .iter()
                .map(|d| d.and_hms_opt(0, 0, 0).unwrap().and_utc())
                .collect(),
            available_session: req.available_session.clone(),
            travel_distance_km: req.travel_distance_km,
            ..VolunteerProfile::default()
        };
        self.state
            .lock()
            .unwrap()
            .profiles
            .insert(req.user_id.clone(), profile);
        Ok(())
    }

    async fn volunteer_profile(&self, session: &Session) -> Result<VolunteerProfile> {
        self.enter("fetch_profile")?;
        self.state
            .lock()
            .unwrap()
            .profiles
            .get(&session.user_id)
            .cloned()
            .ok_or_else(|| not_found("Profile"))
    }

    async fn exam_details(&self, session: &Session) -> Result<ExamDetails> {
        self.enter("fetch_exam_details")?;
        self.state
            .lock()
            .unwrap()
            .exams
            .get(&session.user_id)
            .cloned()
            .ok_or_else(|| not_found("Exam"))
    }

    async fn match_volunteers(&self, _session: &Session, exam_id: &str) -> Result<Vec<MatchedVolunteer>> {
        self.enter("match_volunteers")?;
        let state = self.state.lock().unwrap();
        if !state.exams.values().any(|e| e.id == exam_id) {
            return Err(not_found("Exam"));
        }
        Ok(state.candidates.clone())
    }

    async fn send_request(&self, session: &Session, volunteer_id: &str) -> Result<SendRequestResponse> {
        self.enter("send_request")?;
        let mut state = self.state.lock().unwrap();
        let exam_id = state.exams.get(&session.user_id).map(|e| e.id.clone());
        let id = state.next_id("R");
        let request = ConnectionRequest {
            id,
            disabled_user_id: UserRef::Id(session.user_id.clone()),
            volunteer_user_id: UserRef::Id(volunteer_id.into()),
            status: RequestStatus::Pending,
        };
        state.requests.push((exam_id, request.clone()));
        Ok(SendRequestResponse {
            message: Some("Request sent".into()),
            request: Some(request),
        })
    }

    async fn volunteer_requests(&self, _session: &Session, volunteer_user_id: &str) -> Result<Vec<ConnectionRequest>> {
        self.enter("volunteer_requests")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(_, r)| r.volunteer_user_id.id() == volunteer_user_id && r.is_pending())
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn disabled_requests(&self, _session: &Session, disabled_user_id: &str) -> Result<Vec<ConnectionRequest>> {
        self.enter("disabled_requests")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|(_, r)| r.disabled_user_id.id() == disabled_user_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn respond(&self, _session: &Session, request_id: &str, status: RequestStatus) -> Result<()> {
        self.enter("respond")?;
        let mut state = self.state.lock().unwrap();
        let (_, request) = state
            .requests
            .iter_mut()
            .find(|(_, r)| r.id == request_id)
            .ok_or_else(|| not_found("Request"))?;
        request.status = status;
        Ok(())
    }

    async fn messages(&self, _session: &Session, connection_id: &str) -> Result<Vec<Message>> {
        self.enter("fetch_messages")?;
        let snapshot: Vec<Message> = self
            .state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.connection_id.as_deref() == Some(connection_id))
            .cloned()
            .collect();
        let gate = self.history_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        Ok(snapshot)
    }

    async fn send_message(&self, _session: &Session, req: &SendMessageRequest) -> Result<Message> {
        self.enter("send_message")?;
        let mut state = self.state.lock().unwrap();
        let id = state.next_id("MSG");
        let message = Message {
            id: Some(id),
            sender: req.sender.clone(),
            receiver: req.receiver.clone(),
            content: req.content.clone(),
            connection_id: Some(req.connection_id.clone()),
            created_at: None,
        };
        state.messages.push(message.clone());
        Ok(message)
    }
}
