use std::sync::Arc;

use tracing::{debug, info};

use avida_types::models::{ConnectionRequest, RequestStatus, UserType};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::notify::{Notifier, Page};
use crate::session::Session;

/// Read-through view of the connection requests touching the current user.
///
/// Lists are refetched in full and filtered here; nothing is paginated or
/// synced incrementally. A response is applied only after the server
/// confirms it.
pub struct RequestBoard<A> {
    api: Arc<A>,
    session: Session,
    page: Page,
    pending: Vec<ConnectionRequest>,
    accepted: Vec<ConnectionRequest>,
    /// Requests this board responded to, with their confirmed status.
    responded: Vec<ConnectionRequest>,
}

impl<A: AvidaApi> RequestBoard<A> {
    pub fn new(api: Arc<A>, session: Session, notifier: Notifier) -> Self {
        Self {
            api,
            session,
            page: Page::new(notifier),
            pending: Vec::new(),
            accepted: Vec::new(),
            responded: Vec::new(),
        }
    }

    pub fn pending(&self) -> &[ConnectionRequest] {
        &self.pending
    }

    pub fn accepted(&self) -> &[ConnectionRequest] {
        &self.accepted
    }

    pub fn responded(&self) -> &[ConnectionRequest] {
        &self.responded
    }

    pub fn error(&self) -> Option<&str> {
        self.page.error()
    }

    /// Volunteer view: requests addressed to the current user still awaiting an answer.
    pub async fn load_pending(&mut self) -> Result<&[ConnectionRequest]> {
        let result = self
            .api
            .volunteer_requests(&self.session, &self.session.user_id)
            .await;
        let all = self.page.settle(result)?;
        self.pending = all.into_iter().filter(ConnectionRequest::is_pending).collect();
        debug!("{} pending requests for {}", self.pending.len(), self.session.user_id);
        Ok(&self.pending)
    }

    /// Disabled-user view: requests the current user sent that were accepted.
    pub async fn load_accepted(&mut self) -> Result<&[ConnectionRequest]> {
        let result = self
            .api
            .disabled_requests(&self.session, &self.session.user_id)
            .await;
        let all = self.page.settle(result)?;
        self.accepted = all.into_iter().filter(ConnectionRequest::is_accepted).collect();
        debug!("{} accepted requests for {}", self.accepted.len(), self.session.user_id);
        Ok(&self.accepted)
    }

    /// Accept or reject a pending request. On confirmation the request leaves
    /// the pending view and is returned with its new status.
    pub async fn respond(&mut self, request_id: &str, status: RequestStatus) -> Result<ConnectionRequest> {
        let result = match self.check_respondable(request_id, status) {
            Ok(()) => self.api.respond(&self.session, request_id, status).await,
            Err(e) => Err(e),
        };
        self.page.settle(result)?;

        let pos = self
            .pending
            .iter()
            .position(|r| r.id == request_id)
            .ok_or_else(|| ClientError::validation(format!("Request {} is not pending.", request_id)))?;
        let mut request = self.pending.remove(pos);
        request.status = status;
        self.responded.push(request.clone());

        info!("Request {} {}", request_id, status);
        self.page.notifier().toast(format!("Request {} successfully!", status));
        Ok(request)
    }

    fn check_respondable(&self, request_id: &str, status: RequestStatus) -> Result<()> {
        if status == RequestStatus::Pending {
            return Err(ClientError::validation("A request can only be accepted or rejected."));
        }
        if !self.pending.iter().any(|r| r.id == request_id) {
            return Err(ClientError::validation(format!("Request {} is not pending.", request_id)));
        }
        Ok(())
    }

    /// Find a request by id: local views first, then a full fetch of the
    /// current user's requests.
    ///
    /// The volunteer listing only carries pending requests, so a volunteer
    /// finds a request they answered only through this board's `responded`
    /// view. Later runs open that chat with `ChatSession::open_peer`.
    pub async fn lookup(&mut self, request_id: &str) -> Result<ConnectionRequest> {
        let cached = self
            .responded
            .iter()
            .chain(&self.accepted)
            .chain(&self.pending)
            .find(|r| r.id == request_id)
            .cloned();
        if let Some(request) = cached {
            return Ok(request);
        }

        let result: Result<ConnectionRequest> = async {
            let all = match self.session.user_type {
                UserType::Volunteer => {
                    self.api
                        .volunteer_requests(&self.session, &self.session.user_id)
                        .await?
                }
                UserType::Disabled => {
                    self.api
                        .disabled_requests(&self.session, &self.session.user_id)
                        .await?
                }
            };
            all.into_iter()
                .find(|r| r.id == request_id)
                .ok_or_else(|| ClientError::validation(format!("Request {} not found.", request_id)))
        }
        .await;
        self.page.settle(result)
    }
}
