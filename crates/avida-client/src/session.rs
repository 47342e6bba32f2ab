use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use avida_types::api::LoginResponse;
use avida_types::models::UserType;

use crate::error::{ClientError, Result};

/// Credentials of the logged-in user. Passed explicitly to every flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub user_type: UserType,
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            user_id: resp.user_id,
            user_type: resp.user_type,
        }
    }
}

impl Session {
    pub fn is_volunteer(&self) -> bool {
        self.user_type == UserType::Volunteer
    }

    pub fn is_disabled(&self) -> bool {
        self.user_type == UserType::Disabled
    }
}

/// JSON file holding the session between CLI invocations.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Session>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Like `load`, but a missing session is an error.
    pub fn require(&self) -> Result<Session> {
        self.load()?.ok_or(ClientError::NotAuthenticated)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_vec_pretty(session)?;
        std::fs::write(&self.path, json)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("avida-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn save_load_clear() {
        let file = SessionFile::new(temp_path("session"));
        let session = Session {
            token: "t0k".into(),
            user_id: "D3".into(),
            user_type: UserType::Disabled,
        };

        file.save(&session).unwrap();
        assert_eq!(file.load().unwrap(), Some(session.clone()));
        assert!(file.require().unwrap().is_disabled());

        file.clear().unwrap();
        assert_eq!(file.load().unwrap(), None);
        assert!(matches!(file.require(), Err(ClientError::NotAuthenticated)));
        // clearing twice is fine
        file.clear().unwrap();
    }

    #[test]
    fn session_from_login_response() {
        let resp = LoginResponse {
            token: "abc".into(),
            user_type: UserType::Volunteer,
            user_id: "V7".into(),
        };
        let session = Session::from(resp);
        assert!(session.is_volunteer());
        assert_eq!(session.user_id, "V7");
    }
}
