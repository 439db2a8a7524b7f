use tracing::{info, warn};

use crate::auth::{AuthError, Authenticator};

use super::{Navigation, NavigationError, NavigationGuard, Route};

/// Where a successful login lands when nothing was pending.
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

/// The current location, moved only through the guard.
pub struct Navigator {
    guard: NavigationGuard,
    current: Route,
    location: String,
}

impl Navigator {
    /// Start on the login route.
    pub fn new(guard: NavigationGuard) -> Self {
        let current = *guard.routes().login();
        Self {
            guard,
            current,
            location: current.path.to_string(),
        }
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    /// The target as last requested, query string included.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn navigate(&mut self, target: &str) -> Result<Navigation, NavigationError> {
        let outcome = self.guard.evaluate(target)?;
        match &outcome {
            Navigation::Allowed(route) => {
                self.current = *route;
                self.location = target.to_string();
            }
            Navigation::Redirected { to, intended } => {
                info!(intended = %intended, "Login required");
                self.current = *to;
                self.location = to.path.to_string();
            }
        }
        Ok(outcome)
    }

    /// Log in, then resume at the pending destination (or the default
    /// landing page). Returns the route the user lands on.
    pub async fn login(
        &mut self,
        auth: &dyn Authenticator,
        email: &str,
        password: &str,
    ) -> Result<Route, AuthError> {
        let session = self.guard.session().clone();
        session.login(auth, email, password).await?;

        let destination = session
            .take_pending_destination()
            .unwrap_or_else(|| DEFAULT_LANDING_PATH.to_string());

        if let Err(e) = self.navigate(&destination) {
            warn!(error = %e, destination = %destination, "Post-login navigation failed");
        }
        Ok(self.current)
    }

    /// End the session and land on the login route. Any destination left
    /// pending by an earlier redirect is dropped with the session.
    pub fn logout(&mut self) {
        let session = self.guard.session();
        session.logout();
        session.take_pending_destination();
        self.go_to_login();
    }

    /// Re-run the guard on the current location, e.g. after a forced logout.
    pub fn revalidate(&mut self) -> Navigation {
        let location = self.location.clone();
        match self.navigate(&location) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "Current location no longer resolves");
                self.go_to_login();
                Navigation::Allowed(self.current)
            }
        }
    }

    fn go_to_login(&mut self) {
        self.current = *self.guard.routes().login();
        self.location = self.current.path.to_string();
    }
}
