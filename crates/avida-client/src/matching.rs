use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use avida_types::api::SendRequestResponse;
use avida_types::models::{ExamDetails, MatchedVolunteer};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::notify::{Notifier, Page};
use crate::session::Session;

/// The disabled user's "ready to match" page: load the exam, ask the server
/// for candidate volunteers, and send connection requests to them.
pub struct MatchingFlow<A> {
    api: Arc<A>,
    session: Session,
    page: Page,
    exam: Option<ExamDetails>,
    candidates: Vec<MatchedVolunteer>,
    /// Volunteers a request was sent to during this page load.
    requested: HashSet<String>,
}

impl<A: AvidaApi> MatchingFlow<A> {
    pub fn new(api: Arc<A>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            page: Page::new(notifier),
            exam: None,
            candidates: Vec::new(),
            requested: HashSet::new(),
        }
    }

    pub fn exam(&self) -> Option<&ExamDetails> {
        self.exam.as_ref()
    }

    pub fn candidates(&self) -> &[MatchedVolunteer] {
        &self.candidates
    }

    pub fn error(&self) -> Option<&str> {
        self.page.error()
    }

    pub fn already_requested(&self, volunteer_id: &str) -> bool {
        self.requested.contains(volunteer_id)
    }

    /// Fetch the current user's exam record.
    pub async fn load_exam(&mut self) -> Result<&ExamDetails> {
        let result = self.api.exam_details(&self.session).await;
        let exam = self.page.settle(result)?;
        debug!("Loaded exam {} for {}", exam.id, self.session.user_id);
        Ok(self.exam.insert(exam))
    }

    /// Ask the server for volunteers matching the loaded exam. Replaces the
    /// previous candidate list on success.
    pub async fn find_candidates(&mut self) -> Result<&[MatchedVolunteer]> {
        let result = match &self.exam {
            Some(exam) => self.api.match_volunteers(&self.session, &exam.id).await,
            None => Err(ClientError::validation("Load exam details before matching.")),
        };
        self.candidates = self.page.settle(result)?;
        info!("{} matching volunteers", self.candidates.len());
        Ok(&self.candidates)
    }

    /// Send a connection request to `volunteer_id`. One attempt: on failure the
    /// error is shown and the user has to trigger it again.
    pub async fn send_request(&mut self, volunteer_id: &str) -> Result<SendRequestResponse> {
        let result = if volunteer_id.trim().is_empty() {
            Err(ClientError::validation("Volunteer id is missing."))
        } else {
            self.api.send_request(&self.session, volunteer_id).await
        };
        let ack = self.page.settle(result)?;
        self.requested.insert(volunteer_id.to_string());
        self.page.notifier().toast("Request Sent Successfully");
        Ok(ack)
    }
}
