use avida_types::models::RequestStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally before any network call.
    #[error("{0}")]
    Validation(String),

    /// Chat may only be opened for an accepted request.
    #[error("chat is only available for accepted requests (request {request_id} is {status})")]
    NotAccepted {
        request_id: String,
        status: RequestStatus,
    },

    /// Non-2xx response. `message` is the server's text when it sent one.
    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("not logged in, run `avida login` first")]
    NotAuthenticated,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("session store error: {0}")]
    SessionStore(#[from] std::io::Error),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
