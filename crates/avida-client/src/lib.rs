//! Avida client: the connection-request lifecycle and chat hand-off between a
//! disabled user and a volunteer, on top of the Avida HTTP API.
//!
//! Flows never read ambient state: each one is built from an `AvidaApi`, the
//! caller's `Session`, and a `Notifier` for user-facing notices.

pub mod account;
pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod http;
pub mod matching;
pub mod notify;
pub mod requests;
pub mod session;

#[cfg(test)]
mod fake;

pub use account::AccountFlow;
pub use api::AvidaApi;
pub use chat::{ChatPeer, ChatSession, ChatState};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::HttpApi;
pub use matching::MatchingFlow;
pub use notify::Notifier;
pub use requests::RequestBoard;
pub use session::{Session, SessionFile};
