use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use avida_types::api::{
    DisabledRequestsResponse, ErrorBody, LoginRequest, LoginResponse, MatchResponse,
    MessagesResponse, PendingRequestsResponse, RegisterExamRequest, RegisterVolunteerRequest,
    RespondRequest, SendMessageRequest, SendRequestResponse, SignupRequest,
};
use avida_types::models::{
    ConnectionRequest, ExamDetails, MatchedVolunteer, Message, RequestStatus, VolunteerProfile,
};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::session::Session;

/// reqwest-backed `AvidaApi`. Cookies set by the server are replayed on every
/// later call from the same instance, and the session token is sent as a
/// bearer header. No timeout is configured beyond reqwest's own.
#[derive(Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().cookie_store(true).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, session: &Session, path: &str) -> RequestBuilder {
        authorize(self.client.get(self.url(path)), session)
    }

    fn post(&self, session: &Session, path: &str) -> RequestBuilder {
        authorize(self.client.post(self.url(path)), session)
    }
}

fn authorize(builder: RequestBuilder, session: &Session) -> RequestBuilder {
    if session.token.is_empty() {
        builder
    } else {
        builder.bearer_auth(&session.token)
    }
}

/// Send and turn any non-2xx status into `ClientError::Http`.
/// `action` completes the sentence "Failed to ..." when the server gives no message.
async fn execute(builder: RequestBuilder, action: &str) -> Result<Response> {
    let resp = builder.send().await?;
    let status = resp.status();
    debug!("{} -> {}", resp.url().path(), status);

    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Failed to {}.", action));

    Err(ClientError::Http {
        status: status.as_u16(),
        message,
    })
}

async fn execute_json<T: DeserializeOwned>(builder: RequestBuilder, action: &str) -> Result<T> {
    let resp = execute(builder, action).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Like `execute_json`, but an empty body decodes to `T::default()`.
async fn execute_lenient<T: DeserializeOwned + Default>(
    builder: RequestBuilder,
    action: &str,
) -> Result<T> {
    let resp = execute(builder, action).await?;
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

impl AvidaApi for HttpApi {
    async fn signup(&self, req: &SignupRequest) -> Result<()> {
        execute(self.client.post(self.url("/signup")).json(req), "sign up").await?;
        Ok(())
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        execute_json(self.client.post(self.url("/login")).json(req), "log in").await
    }

    async fn logout(&self, session: &Session) -> Result<()> {
        execute(self.post(session, "/logout"), "log out").await?;
        Ok(())
    }

    async fn register_exam(&self, session: &Session, req: &RegisterExamRequest) -> Result<()> {
        execute(self.post(session, "/register-exam").json(req), "register exam").await?;
        Ok(())
    }

    async fn register_volunteer(
        &self,
        session: &Session,
        req: &RegisterVolunteerRequest,
    ) -> Result<()> {
        execute(
            self.post(session, "/register-volunteer").json(req),
            "register volunteer",
        )
        .await?;
        Ok(())
    }

    async fn volunteer_profile(&self, session: &Session) -> Result<VolunteerProfile> {
        execute_json(self.get(session, "/profile"), "fetch profile details").await
    }

    async fn exam_details(&self, session: &Session) -> Result<ExamDetails> {
        execute_json(self.get(session, "/get-exam-details"), "fetch exam details").await
    }

    async fn match_volunteers(
        &self,
        session: &Session,
        exam_id: &str,
    ) -> Result<Vec<MatchedVolunteer>> {
        let resp: MatchResponse = execute_lenient(
            self.post(session, &format!("/match-volunteers/{}", exam_id)),
            "fetch matched volunteers",
        )
        .await?;
        Ok(resp.matched_volunteers)
    }

    async fn send_request(&self, session: &Session, volunteer_id: &str) -> Result<SendRequestResponse> {
        execute_lenient(
            self.post(session, &format!("/send/{}", volunteer_id)),
            "send request",
        )
        .await
    }

    async fn volunteer_requests(
        &self,
        session: &Session,
        volunteer_user_id: &str,
    ) -> Result<Vec<ConnectionRequest>> {
        let resp: PendingRequestsResponse = execute_lenient(
            self.get(session, &format!("/requests/{}", volunteer_user_id)),
            "fetch connection requests",
        )
        .await?;
        Ok(resp.pending_requests)
    }

    async fn disabled_requests(
        &self,
        session: &Session,
        disabled_user_id: &str,
    ) -> Result<Vec<ConnectionRequest>> {
        let resp: DisabledRequestsResponse = execute_lenient(
            self.get(session, &format!("/disabled-requests/{}", disabled_user_id)),
            "fetch connection requests",
        )
        .await?;
        Ok(resp.requests)
    }

    async fn respond(&self, session: &Session, request_id: &str, status: RequestStatus) -> Result<()> {
        let action = match status {
            RequestStatus::Accepted => "accept request",
            RequestStatus::Rejected => "reject request",
            RequestStatus::Pending => "update request",
        };
        execute(
            self.post(session, &format!("/respond/{}", request_id))
                .json(&RespondRequest { status }),
            action,
        )
        .await?;
        Ok(())
    }

    async fn messages(&self, session: &Session, connection_id: &str) -> Result<Vec<Message>> {
        let resp: MessagesResponse = execute_lenient(
            self.get(session, &format!("/messages/{}", connection_id)),
            "fetch messages",
        )
        .await?;
        Ok(resp.messages)
    }

    async fn send_message(&self, session: &Session, req: &SendMessageRequest) -> Result<Message> {
        execute_json(self.post(session, "/send-message").json(req), "send message").await
    }
}
