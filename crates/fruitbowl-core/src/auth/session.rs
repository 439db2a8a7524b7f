use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{AuthError, SessionStorage};

/// Storage key holding the serialized session.
pub const SESSION_KEY: &str = "user";

/// The persisted part of an authenticated session.
///
/// Token and email live in one value so an identity can never exist
/// without its credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,
    pub email: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Exchanges an email and password for a bearer token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> Result<String, AuthError>;
}

#[derive(Debug, Default)]
struct SessionState {
    data: Option<SessionData>,
    pending_destination: Option<String>,
}

/// Owner of the process-wide authentication state.
///
/// Construct one at startup with [`SessionStore::open`] and share it through
/// an `Arc` with the request gateway and the navigation guard. Storage is
/// read only inside `open`, written only by `login` and cleared only by
/// `logout`.
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
    login_in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of `login`.
struct LoginGuard<'a>(&'a AtomicBool);

impl<'a> LoginGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoginGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionStore {
    /// Rehydrate the session from durable storage.
    pub fn open(storage: Arc<dyn SessionStorage>) -> Self {
        let data = Self::rehydrate(storage.as_ref());
        Self {
            storage,
            state: RwLock::new(SessionState {
                data,
                pending_destination: None,
            }),
            login_in_flight: AtomicBool::new(false),
        }
    }

    fn rehydrate(storage: &dyn SessionStorage) -> Option<SessionData> {
        let contents = match storage.get(SESSION_KEY) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!("No persisted session");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read persisted session");
                return None;
            }
        };

        match serde_json::from_str::<SessionData>(&contents) {
            Ok(data) if data.token.is_empty() => {
                warn!("Persisted session has an empty token, ignoring");
                None
            }
            Ok(data) => {
                debug!(email = %data.email, "Session restored from storage");
                Some(data)
            }
            Err(e) => {
                warn!(error = %e, "Failed to parse persisted session, starting logged out");
                None
            }
        }
    }

    /// Authenticate against the remote endpoint and start a session.
    ///
    /// On failure the current state is left exactly as it was.
    pub async fn login(
        &self,
        auth: &dyn Authenticator,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let _guard = LoginGuard::acquire(&self.login_in_flight).ok_or_else(|| {
            debug!("Login rejected, another login is awaiting its response");
            AuthError::LoginInProgress
        })?;

        let token = match auth.authenticate(email, password).await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Login failed");
                return Err(e);
            }
        };

        let data = SessionData {
            token,
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.persist(&data);
        self.state.write().data = Some(data);

        info!(email, "Login successful");
        Ok(())
    }

    /// The in-memory session stays authoritative if the write fails.
    fn persist(&self, data: &SessionData) {
        let result = serde_json::to_string(data)
            .map_err(anyhow::Error::from)
            .and_then(|contents| self.storage.set(SESSION_KEY, &contents));
        if let Err(e) = result {
            warn!(error = %e, "Failed to save session");
        }
    }

    /// End the session. Idempotent and infallible.
    pub fn logout(&self) {
        let previous = self.state.write().data.take();

        if let Err(e) = self.storage.delete(SESSION_KEY) {
            warn!(error = %e, "Failed to remove persisted session");
        }

        match previous {
            Some(data) => info!(email = %data.email, "Logged out"),
            None => debug!("Logout requested with no active session"),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().data.is_some()
    }

    pub fn is_login_in_flight(&self) -> bool {
        self.login_in_flight.load(Ordering::Acquire)
    }

    /// Snapshot of the current bearer token.
    pub fn token(&self) -> Option<String> {
        self.state.read().data.as_ref().map(|d| d.token.clone())
    }

    pub fn email(&self) -> Option<String> {
        self.state.read().data.as_ref().map(|d| d.email.clone())
    }

    pub fn data(&self) -> Option<SessionData> {
        self.state.read().data.clone()
    }

    /// Remember where an unauthenticated user was headed.
    pub fn set_pending_destination(&self, destination: impl Into<String>) {
        self.state.write().pending_destination = Some(destination.into());
    }

    pub fn pending_destination(&self) -> Option<String> {
        self.state.read().pending_destination.clone()
    }

    pub fn take_pending_destination(&self) -> Option<String> {
        self.state.write().pending_destination.take()
    }
}
