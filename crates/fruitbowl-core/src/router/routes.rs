use std::collections::HashMap;

use super::NavigationError;

/// Path of the login route in the default table.
pub const LOGIN_PATH: &str = "/login";

/// A declared route and its static protection flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub requires_authentication: bool,
}

impl Route {
    pub const fn public(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_authentication: false,
        }
    }

    pub const fn protected(name: &'static str, path: &'static str) -> Self {
        Self {
            name,
            path,
            requires_authentication: true,
        }
    }
}

const DEFAULT_ROUTES: [Route; 4] = [
    Route::public("Home", "/"),
    Route::public("Login", LOGIN_PATH),
    Route::protected("Dashboard", "/dashboard"),
    Route::protected("Update", "/update"),
];

/// Lookup table from path to route metadata.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<&'static str, Route>,
    login: Route,
}

impl RouteTable {
    pub fn new(
        routes: impl IntoIterator<Item = Route>,
        login_path: &str,
    ) -> Result<Self, NavigationError> {
        let routes: HashMap<&'static str, Route> = routes
            .into_iter()
            .map(|route| (Self::normalize(route.path), route))
            .collect();

        let login = routes
            .get(Self::normalize(login_path))
            .copied()
            .ok_or_else(|| NavigationError::MissingLoginRoute(login_path.to_string()))?;

        Ok(Self { routes, login })
    }

    /// Strip the query string, fragment and trailing slash from a target.
    pub fn normalize(target: &str) -> &str {
        let path = target.split(['?', '#']).next().unwrap_or(target);
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/"
        } else {
            trimmed
        }
    }

    pub fn resolve(&self, target: &str) -> Option<&Route> {
        self.routes.get(Self::normalize(target))
    }

    pub fn login(&self) -> &Route {
        &self.login
    }

    /// All routes, ordered by path.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes: Vec<&Route> = self.routes.values().collect();
        routes.sort_by_key(|r| r.path);
        routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: DEFAULT_ROUTES.iter().map(|r| (r.path, *r)).collect(),
            login: DEFAULT_ROUTES[1],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(RouteTable::normalize("/dashboard"), "/dashboard");
        assert_eq!(RouteTable::normalize("/dashboard/"), "/dashboard");
        assert_eq!(RouteTable::normalize("/update?id=4"), "/update");
        assert_eq!(RouteTable::normalize("/update#top"), "/update");
        assert_eq!(RouteTable::normalize("/"), "/");
        assert_eq!(RouteTable::normalize(""), "/");
        assert_eq!(RouteTable::normalize("/?q=x"), "/");
    }

    #[test]
    fn test_default_table() {
        let table = RouteTable::default();
        assert_eq!(table.login().path, LOGIN_PATH);
        assert!(!table.login().requires_authentication);

        assert!(!table.resolve("/").unwrap().requires_authentication);
        assert!(table.resolve("/dashboard").unwrap().requires_authentication);
        assert!(table.resolve("/update?id=2").unwrap().requires_authentication);
        assert!(table.resolve("/nowhere").is_none());
    }

    #[test]
    fn test_routes_sorted_by_path() {
        let table = RouteTable::default();
        let paths: Vec<&str> = table.routes().iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/", "/dashboard", "/login", "/update"]);
    }

    #[test]
    fn test_custom_table_requires_login_route() {
        let err = RouteTable::new([Route::protected("Admin", "/admin")], "/signin").unwrap_err();
        assert_eq!(err, NavigationError::MissingLoginRoute("/signin".to_string()));

        let table = RouteTable::new(
            [
                Route::public("Sign in", "/signin"),
                Route::protected("Admin", "/admin/"),
            ],
            "/signin/",
        )
        .unwrap();
        assert_eq!(table.login().name, "Sign in");
        assert_eq!(table.resolve("/admin").unwrap().name, "Admin");
    }
}
