use std::future::Future;

use avida_types::api::{
    LoginRequest, LoginResponse, RegisterExamRequest, RegisterVolunteerRequest,
    SendMessageRequest, SendRequestResponse, SignupRequest,
};
use avida_types::models::{
    ConnectionRequest, ExamDetails, MatchedVolunteer, Message, RequestStatus, VolunteerProfile,
};

use crate::error::Result;
use crate::session::Session;

/// The Avida backend as the client sees it: one method per endpoint.
///
/// `HttpApi` talks to the real server; tests substitute an in-memory fake.
/// Every call is a single attempt with no retry.
pub trait AvidaApi: Send + Sync + 'static {
    // -- Auth --

    /// `POST /signup`
    fn signup(&self, req: &SignupRequest) -> impl Future<Output = Result<()>> + Send;

    /// `POST /login`
    fn login(&self, req: &LoginRequest) -> impl Future<Output = Result<LoginResponse>> + Send;

    /// `POST /logout`
    fn logout(&self, session: &Session) -> impl Future<Output = Result<()>> + Send;

    // -- Registration and profiles --

    /// `POST /register-exam`
    fn register_exam(
        &self,
        session: &Session,
        req: &RegisterExamRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `POST /register-volunteer`
    fn register_volunteer(
        &self,
        session: &Session,
        req: &RegisterVolunteerRequest,
    ) -> impl Future<Output = Result<()>> + Send;

    /// `GET /profile`
    fn volunteer_profile(
        &self,
        session: &Session,
    ) -> impl Future<Output = Result<VolunteerProfile>> + Send;

    /// `GET /get-exam-details`
    fn exam_details(&self, session: &Session) -> impl Future<Output = Result<ExamDetails>> + Send;

    // -- Matching --

    /// `POST /match-volunteers/{exam_id}`
    fn match_volunteers(
        &self,
        session: &Session,
        exam_id: &str,
    ) -> impl Future<Output = Result<Vec<MatchedVolunteer>>> + Send;

    /// `POST /send/{volunteer_id}`
    fn send_request(
        &self,
        session: &Session,
        volunteer_id: &str,
    ) -> impl Future<Output = Result<SendRequestResponse>> + Send;

    // -- Connection requests --

    /// `GET /requests/{volunteer_user_id}`: everything addressed to a volunteer.
    fn volunteer_requests(
        &self,
        session: &Session,
        volunteer_user_id: &str,
    ) -> impl Future<Output = Result<Vec<ConnectionRequest>>> + Send;

    /// `GET /disabled-requests/{disabled_user_id}`: everything a disabled user sent.
    fn disabled_requests(
        &self,
        session: &Session,
        disabled_user_id: &str,
    ) -> impl Future<Output = Result<Vec<ConnectionRequest>>> + Send;

    /// `POST /respond/{request_id}`
    fn respond(
        &self,
        session: &Session,
        request_id: &str,
        status: RequestStatus,
    ) -> impl Future<Output = Result<()>> + Send;

    // -- Messages --

    /// `GET /messages/{connection_id}`
    fn messages(
        &self,
        session: &Session,
        connection_id: &str,
    ) -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// `POST /send-message`. Returns the server's copy of the stored message.
    fn send_message(
        &self,
        session: &Session,
        req: &SendMessageRequest,
    ) -> impl Future<Output = Result<Message>> + Send;
}
