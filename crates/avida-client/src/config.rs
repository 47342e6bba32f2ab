use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "https://avida-backend.onrender.com";
pub const DEFAULT_SESSION_PATH: &str = "avida-session.json";
pub const DEFAULT_CHAT_POLL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_path: PathBuf,
    /// Interval for opt-in chat refresh loops. The library never polls on its own.
    pub chat_poll_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            chat_poll_interval: Duration::from_secs(DEFAULT_CHAT_POLL_SECS),
        }
    }
}

impl ClientConfig {
    /// Read `AVIDA_API_URL`, `AVIDA_SESSION_PATH` and `AVIDA_CHAT_POLL_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("AVIDA_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "AVIDA_API_URL must be an http(s) URL, got '{}'",
                api_url
            )));
        }

        let session_path = lookup("AVIDA_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let chat_poll_interval = match lookup("AVIDA_CHAT_POLL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ClientError::Config(format!("AVIDA_CHAT_POLL_SECS is not a number: '{}'", raw))
                })?;
                if secs == 0 {
                    return Err(ClientError::Config("AVIDA_CHAT_POLL_SECS must be at least 1".into()));
                }
                Duration::from_secs(secs)
            }
            None => defaults.chat_poll_interval,
        };

        Ok(Self {
            api_url,
            session_path,
            chat_poll_interval,
        })
    }
}
