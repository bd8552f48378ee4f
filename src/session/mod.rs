//! Authenticated session: login, persistence and token supply
//!
//! The session is a singleton record, not a collection: at most one
//! current session exists per client. On a successful login the session
//! (token included) is persisted as JSON to a local file and rehydrated the
//! next time the client is built; logout clears both the in-memory session
//! and the file. No other entity state is persisted client-side.

use crate::core::error::{ApiError, ApiResult};
use crate::core::status::LoadStatus;
use crate::gateway::{self, TokenProvider};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;
use validator::Validate;

/// Login form submitted to `Users/Login`
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// The authenticated session record returned by the remote API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image_url: String,
    pub token: String,
    pub is_authenticated: bool,
}

#[derive(Default)]
struct SessionState {
    session: Option<Session>,
    status: LoadStatus,
    error: Option<String>,
}

/// Store for the current session.
///
/// Doubles as the [`TokenProvider`] for every protected gateway, so a
/// login immediately arms all entity stores and a logout disarms them.
pub struct SessionStore {
    http: reqwest::Client,
    base_url: String,
    file: PathBuf,
    state: Arc<RwLock<SessionState>>,
}

impl SessionStore {
    /// Create a session store, rehydrating any previously persisted
    /// session from `file`. A missing or unreadable file starts the store
    /// signed out.
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let file = file.into();
        let session = rehydrate(&file);
        Self {
            http,
            base_url: base_url.into(),
            file,
            state: Arc::new(RwLock::new(SessionState {
                session,
                status: LoadStatus::Idle,
                error: None,
            })),
        }
    }

    /// Log in against `Users/Login` and persist the returned session.
    ///
    /// A `200` response carrying `isAuthenticated: false` is treated as
    /// rejected credentials.
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<Session> {
        {
            let mut state = self.write_state();
            state.status = LoadStatus::Loading;
            state.error = None;
        }

        match self.attempt_login(credentials).await {
            Ok(session) => {
                let mut state = self.write_state();
                state.session = Some(session.clone());
                state.status = LoadStatus::Succeeded;
                tracing::info!(email = %session.email, "session established");
                Ok(session)
            }
            Err(err) => {
                let mut state = self.write_state();
                state.status = LoadStatus::Failed;
                state.error = Some(err.message());
                Err(err)
            }
        }
    }

    async fn attempt_login(&self, credentials: &Credentials) -> ApiResult<Session> {
        credentials.validate()?;

        let url = gateway::join_url(&self.base_url, "Users/Login");
        tracing::debug!(url, "dispatching login");
        let response = self.http.post(url).json(credentials).send().await?;
        let session: Session = gateway::expect_json(response, "session", None).await?;
        if !session.is_authenticated {
            return Err(ApiError::InvalidCredentials);
        }
        self.persist(&session)?;
        Ok(session)
    }

    /// Clear the in-memory session and remove the persisted file
    pub fn logout(&self) -> ApiResult<()> {
        {
            let mut state = self.write_state();
            state.session = None;
            state.status = LoadStatus::Idle;
            state.error = None;
        }
        match std::fs::remove_file(&self.file) {
            Ok(()) => {}
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(ApiError::Persistence(err.to_string())),
        }
        tracing::info!("session cleared");
        Ok(())
    }

    /// The current session, if one is established
    pub fn current(&self) -> Option<Session> {
        self.read_state().session.clone()
    }

    /// Whether a session with a token is currently established
    pub fn is_authenticated(&self) -> bool {
        self.read_state()
            .session
            .as_ref()
            .is_some_and(|session| session.is_authenticated)
    }

    /// Lifecycle status of the most recent login attempt
    pub fn status(&self) -> LoadStatus {
        self.read_state().status
    }

    /// Message of the most recent login failure
    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    /// Path of the persisted session file
    pub fn file(&self) -> &Path {
        &self.file
    }

    fn persist(&self, session: &Session) -> ApiResult<()> {
        let body = serde_json::to_string_pretty(session)
            .map_err(|err| ApiError::Persistence(err.to_string()))?;
        std::fs::write(&self.file, body).map_err(|err| ApiError::Persistence(err.to_string()))
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenProvider for SessionStore {
    fn token(&self) -> Option<String> {
        self.read_state()
            .session
            .as_ref()
            .map(|session| session.token.clone())
    }
}

/// Load a persisted session, tolerating absence and corruption
fn rehydrate(file: &Path) -> Option<Session> {
    let body = match std::fs::read_to_string(file) {
        Ok(body) => body,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(file = %file.display(), error = %err, "could not read persisted session");
            return None;
        }
    };
    match serde_json::from_str(&body) {
        Ok(session) => Some(session),
        Err(err) => {
            tracing::warn!(file = %file.display(), error = %err, "discarding corrupt persisted session");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_validation() {
        let bad_email = Credentials {
            email: "not-an-email".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let empty_password = Credentials {
            email: "admin@mediplus.test".to_string(),
            password: String::new(),
        };
        assert!(empty_password.validate().is_err());

        let good = Credentials {
            email: "admin@mediplus.test".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_session_wire_shape_is_camel_case() {
        let session = Session {
            user_id: Uuid::nil(),
            email: "admin@mediplus.test".to_string(),
            name: "Admin".to_string(),
            image_url: "/images/admin.png".to_string(),
            token: "jwt".to_string(),
            is_authenticated: true,
        };
        let value = serde_json::to_value(&session).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("imageUrl").is_some());
        assert!(value.get("isAuthenticated").is_some());
    }
}
