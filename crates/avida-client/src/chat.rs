use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use avida_types::api::SendMessageRequest;
use avida_types::models::{ConnectionRequest, Message};

use crate::api::AvidaApi;
use crate::error::{ClientError, Result};
use crate::notify::Notifier;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    Closed,
    Loading,
    Ready,
}

/// The accepted request a chat is bound to, seen from the current user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPeer {
    pub connection_id: String,
    pub receiver_id: String,
    pub receiver_name: Option<String>,
}

/// Conversation view for one accepted connection.
///
/// Cloning yields another handle on the same view, so a UI can close the
/// chat while a fetch is still in flight. Every `open` and `close` bumps an
/// epoch; a fetch that completes under an older epoch is dropped.
pub struct ChatSession<A> {
    inner: Arc<ChatInner<A>>,
}

impl<A> Clone for ChatSession<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

struct ChatInner<A> {
    api: Arc<A>,
    session: Session,
    notifier: Notifier,
    view: RwLock<ChatView>,
}

struct ChatView {
    state: ChatState,
    epoch: u64,
    peer: Option<ChatPeer>,
    messages: Vec<Message>,
    /// Messages this handle sent since the chat was opened.
    sent: Vec<Message>,
    error: Option<String>,
}

impl ChatView {
    fn fail(&mut self, notifier: &Notifier, err: &ClientError) {
        let text = err.to_string();
        notifier.error(text.clone());
        self.error = Some(text);
    }
}

impl<A: AvidaApi> ChatSession<A> {
    pub fn new(api: Arc<A>, session: Session, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(ChatInner {
                api,
                session,
                notifier,
                view: RwLock::new(ChatView {
                    state: ChatState::Closed,
                    epoch: 0,
                    peer: None,
                    messages: Vec::new(),
                    sent: Vec::new(),
                    error: None,
                }),
            }),
        }
    }

    pub async fn state(&self) -> ChatState {
        self.inner.view.read().await.state
    }

    pub async fn peer(&self) -> Option<ChatPeer> {
        self.inner.view.read().await.peer.clone()
    }

    /// Snapshot of the visible conversation, in server arrival order.
    pub async fn messages(&self) -> Vec<Message> {
        self.inner.view.read().await.messages.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.inner.view.read().await.error.clone()
    }

    /// Whether `message` was written by the current user.
    pub fn is_own(&self, message: &Message) -> bool {
        message.sender == self.inner.session.user_id
    }

    /// Open the chat for `request` and load its history once.
    ///
    /// Only accepted requests can be opened. Anything else is refused without
    /// a network call: state, peer and messages stay as they were, and the
    /// refusal is recorded as the chat error.
    pub async fn open(&self, request: &ConnectionRequest) -> Result<()> {
        if !request.is_accepted() {
            let err = ClientError::NotAccepted {
                request_id: request.id.clone(),
                status: request.status,
            };
            self.inner.view.write().await.fail(&self.inner.notifier, &err);
            return Err(err);
        }

        let counterpart = request.counterpart(self.inner.session.user_type);
        self.open_peer(ChatPeer {
            connection_id: request.id.clone(),
            receiver_id: counterpart.id().to_string(),
            receiver_name: counterpart.display_name(),
        })
        .await
    }

    /// Open the chat for a connection the caller already knows is accepted,
    /// e.g. one a volunteer accepted in an earlier run. The volunteer request
    /// listing only carries pending requests, so this is their way back in.
    pub async fn open_peer(&self, peer: ChatPeer) -> Result<()> {
        if peer.connection_id.trim().is_empty() {
            let err = ClientError::validation("Connection ID is missing.");
            self.inner.view.write().await.fail(&self.inner.notifier, &err);
            return Err(err);
        }

        let epoch = {
            let mut view = self.inner.view.write().await;
            view.epoch += 1;
            view.state = ChatState::Loading;
            view.peer = Some(peer.clone());
            view.messages.clear();
            view.sent.clear();
            view.error = None;
            view.epoch
        };
        info!("Opening chat {}", peer.connection_id);

        self.load(epoch, &peer.connection_id).await
    }

    /// Re-fetch the history of the open chat and replace the visible list.
    pub async fn refresh(&self) -> Result<()> {
        let (epoch, connection_id) = {
            let view = self.inner.view.read().await;
            match (&view.state, &view.peer) {
                (ChatState::Ready, Some(peer)) => (view.epoch, peer.connection_id.clone()),
                _ => return Err(ClientError::validation("Chat is not open.")),
            }
        };
        self.load(epoch, &connection_id).await
    }

    /// Fetch history and replace the visible list. Messages this handle sent
    /// while the fetch was in flight are kept after the server's snapshot.
    async fn load(&self, epoch: u64, connection_id: &str) -> Result<()> {
        let sent_mark = self.inner.view.read().await.sent.len();
        let result = self.inner.api.messages(&self.inner.session, connection_id).await;

        let mut view = self.inner.view.write().await;
        if view.epoch != epoch {
            debug!("Discarding history for {} fetched after the view changed", connection_id);
            return Ok(());
        }
        view.state = ChatState::Ready;
        match result {
            Ok(mut messages) => {
                debug!("Loaded {} messages for {}", messages.len(), connection_id);
                let late: Vec<Message> = view
                    .sent
                    .get(sent_mark..)
                    .unwrap_or_default()
                    .iter()
                    .filter(|m| !messages.iter().any(|h| same_message(h, m)))
                    .cloned()
                    .collect();
                messages.extend(late);
                view.messages = messages;
                view.error = None;
                Ok(())
            }
            Err(e) => {
                view.fail(&self.inner.notifier, &e);
                Err(e)
            }
        }
    }

    /// Send `content` to the other party. Blank content is refused locally.
    /// The server's stored copy is what gets appended and returned.
    pub async fn send(&self, content: &str) -> Result<Message> {
        let (epoch, req) = {
            let mut view = self.inner.view.write().await;
            let checked = match (&view.state, &view.peer) {
                (ChatState::Closed, _) | (_, None) => Err(ClientError::validation("Chat is not open.")),
                (ChatState::Loading, _) => Err(ClientError::validation("Chat is still loading.")),
                _ if content.trim().is_empty() => {
                    Err(ClientError::validation("Message cannot be empty."))
                }
                (_, Some(peer)) if peer.receiver_id.is_empty() => {
                    Err(ClientError::validation("Receiver ID is missing."))
                }
                (_, Some(peer)) => Ok(SendMessageRequest {
                    connection_id: peer.connection_id.clone(),
                    sender: self.inner.session.user_id.clone(),
                    receiver: peer.receiver_id.clone(),
                    content: content.to_string(),
                }),
            };
            match checked {
                Ok(req) => (view.epoch, req),
                Err(e) => {
                    view.fail(&self.inner.notifier, &e);
                    return Err(e);
                }
            }
        };

        let result = self.inner.api.send_message(&self.inner.session, &req).await;

        let mut view = self.inner.view.write().await;
        match result {
            Ok(message) => {
                if view.epoch == epoch {
                    // A refresh may already have brought it in
                    if !view.messages.iter().any(|m| same_message(m, &message)) {
                        view.messages.push(message.clone());
                    }
                    view.sent.push(message.clone());
                    view.error = None;
                } else {
                    debug!("Chat {} changed before the send completed", req.connection_id);
                }
                Ok(message)
            }
            Err(e) => {
                warn!("Error sending message: {}", e);
                if view.epoch == epoch {
                    view.fail(&self.inner.notifier, &e);
                }
                Err(e)
            }
        }
    }

    /// Leave the chat. Any fetch still in flight is discarded when it lands.
    pub async fn close(&self) {
        let mut view = self.inner.view.write().await;
        view.epoch += 1;
        view.state = ChatState::Closed;
        view.peer = None;
        view.messages.clear();
        view.sent.clear();
        view.error = None;
    }
}

/// Server ids when both sides have one, full equality otherwise.
fn same_message(a: &Message, b: &Message) -> bool {
    match (&a.id, &b.id) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}
