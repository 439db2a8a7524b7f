use std::sync::Arc;

use tracing::debug;

use crate::auth::SessionStore;

use super::{NavigationError, Route, RouteTable};

/// Outcome of a single navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allowed(Route),
    /// The attempt was cancelled and replaced by a navigation to `to`.
    Redirected { to: Route, intended: String },
}

impl Navigation {
    /// Where the user actually lands.
    pub fn destination(&self) -> &Route {
        match self {
            Navigation::Allowed(route) => route,
            Navigation::Redirected { to, .. } => to,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Navigation::Redirected { .. })
    }
}

/// Gates route transitions on the in-memory session state.
///
/// Evaluation is synchronous and never touches the network.
pub struct NavigationGuard {
    session: Arc<SessionStore>,
    routes: RouteTable,
}

impl NavigationGuard {
    pub fn new(session: Arc<SessionStore>, routes: RouteTable) -> Self {
        Self { session, routes }
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Decide the outcome for `target`. A redirect records the target as the
    /// session's pending destination.
    pub fn evaluate(&self, target: &str) -> Result<Navigation, NavigationError> {
        let route = *self
            .routes
            .resolve(target)
            .ok_or_else(|| NavigationError::UnknownRoute(target.to_string()))?;

        if route.requires_authentication && !self.session.is_authenticated() {
            debug!(path = %target, "Unauthenticated navigation redirected to login");
            self.session.set_pending_destination(target);
            return Ok(Navigation::Redirected {
                to: *self.routes.login(),
                intended: target.to_string(),
            });
        }

        Ok(Navigation::Allowed(route))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{MemoryStorage, SessionStorage, SESSION_KEY};
    use crate::router::LOGIN_PATH;

    fn guard(authenticated: bool) -> NavigationGuard {
        let storage = Arc::new(MemoryStorage::new());
        if authenticated {
            storage
                .set(SESSION_KEY, r#"{"token":"tok","email":"ada@example.com"}"#)
                .unwrap();
        }
        NavigationGuard::new(Arc::new(SessionStore::open(storage)), RouteTable::default())
    }

    #[test]
    fn test_protected_route_redirects_when_logged_out() {
        let guard = guard(false);
        let outcome = guard.evaluate("/dashboard").unwrap();

        assert!(outcome.is_redirect());
        assert_eq!(outcome.destination().path, LOGIN_PATH);
        assert_eq!(
            outcome,
            Navigation::Redirected {
                to: *guard.routes().login(),
                intended: "/dashboard".to_string(),
            }
        );
        assert_eq!(guard.session().pending_destination().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_every_protected_route_lands_on_login() {
        let guard = guard(false);
        for route in guard.routes().routes() {
            let outcome = guard.evaluate(route.path).unwrap();
            if route.requires_authentication {
                assert_eq!(outcome.destination().path, LOGIN_PATH, "{}", route.path);
            } else {
                assert_eq!(outcome, Navigation::Allowed(*route));
            }
        }
    }

    #[test]
    fn test_protected_route_allowed_when_logged_in() {
        let guard = guard(true);
        let outcome = guard.evaluate("/update?id=3").unwrap();
        assert_eq!(outcome.destination().name, "Update");
        assert!(!outcome.is_redirect());
        assert_eq!(guard.session().pending_destination(), None);
    }

    #[test]
    fn test_public_routes_always_allowed() {
        for authenticated in [false, true] {
            let guard = guard(authenticated);
            assert!(!guard.evaluate("/").unwrap().is_redirect());
            assert!(!guard.evaluate(LOGIN_PATH).unwrap().is_redirect());
        }
    }

    #[test]
    fn test_pending_destination_keeps_full_target() {
        let guard = guard(false);
        guard.evaluate("/update?id=9").unwrap();
        assert_eq!(guard.session().pending_destination().as_deref(), Some("/update?id=9"));
    }

    #[test]
    fn test_unknown_route() {
        let guard = guard(true);
        assert_eq!(
            guard.evaluate("/admin"),
            Err(NavigationError::UnknownRoute("/admin".to_string()))
        );
    }
}
