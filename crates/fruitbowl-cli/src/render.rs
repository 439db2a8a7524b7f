//! Text rendering for each route.

use std::fmt::Write;

use fruitbowl_core::models::Fruit;
use fruitbowl_core::{FruitCatalog, Route, SessionStore};

/// Render the page for `route`.
pub fn render_page(route: &Route, session: &SessionStore, catalog: &FruitCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", route.name);

    match route.name {
        "Home" => {
            out.push_str("Welcome to Fruitbowl.\n");
            if session.is_authenticated() {
                out.push_str("Type `list` to see the catalog.\n");
            } else {
                out.push_str("Type `login` to sign in.\n");
            }
        }
        "Login" => {
            if let Some(email) = session.email() {
                let _ = writeln!(out, "Already logged in as {}.", email);
            } else {
                out.push_str("Please log in: `login [email]`\n");
                if let Some(pending) = session.pending_destination() {
                    let _ = writeln!(out, "You will continue to {} afterwards.", pending);
                }
            }
        }
        "Update" => {
            out.push_str(&render_fruits(&catalog.fruits, true));
            out.push_str("Use `add`, `edit` or `rm` to change the catalog.\n");
        }
        _ => {
            out.push_str(&render_fruits(&catalog.fruits, false));
        }
    }

    if let Some(ref error) = catalog.error {
        let _ = writeln!(out, "! {}", error);
    }
    out
}

/// One line per fruit, optionally with its id.
pub fn render_fruits(fruits: &[Fruit], with_ids: bool) -> String {
    if fruits.is_empty() {
        return "No fruits.\n".to_string();
    }
    let mut out = String::new();
    for fruit in fruits {
        let details = fruit.details_display();
        let line = match (with_ids, details.is_empty()) {
            (true, true) => format!("#{:<4} {}", fruit.id, fruit.name),
            (true, false) => format!("#{:<4} {}  ({})", fruit.id, fruit.name, details),
            (false, true) => format!("- {}", fruit.name),
            (false, false) => format!("- {}  ({})", fruit.name, details),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use fruitbowl_core::auth::MemoryStorage;
    use fruitbowl_core::ApiClient;

    fn fruit(json: &str) -> Fruit {
        serde_json::from_str(json).unwrap()
    }

    fn fixtures() -> (Arc<SessionStore>, FruitCatalog) {
        let session = Arc::new(SessionStore::open(Arc::new(MemoryStorage::new())));
        let api = ApiClient::new("http://localhost:5000/api", session.clone()).unwrap();
        (session, FruitCatalog::new(api))
    }

    #[test]
    fn test_render_fruits() {
        let fruits = vec![
            fruit(r#"{"id":1,"name":"Apple","color":"red"}"#),
            fruit(r#"{"id":2,"name":"Pear"}"#),
        ];
        assert_eq!(render_fruits(&fruits, false), "- Apple  (color=red)\n- Pear\n");
        assert_eq!(
            render_fruits(&fruits, true),
            "#1    Apple  (color=red)\n#2    Pear\n"
        );
        assert_eq!(render_fruits(&[], true), "No fruits.\n");
    }

    #[test]
    fn test_login_page_mentions_pending_destination() {
        let (session, catalog) = fixtures();
        session.set_pending_destination("/update");
        let route = Route::public("Login", "/login");

        let page = render_page(&route, &session, &catalog);

        assert!(page.starts_with("== Login =="));
        assert!(page.contains("continue to /update"));
    }

    #[test]
    fn test_catalog_error_is_shown() {
        let (session, mut catalog) = fixtures();
        catalog.error = Some("Failed to load fruits: boom".to_string());
        let route = Route::protected("Dashboard", "/dashboard");

        let page = render_page(&route, &session, &catalog);

        assert!(page.contains("No fruits."));
        assert!(page.contains("! Failed to load fruits: boom"));
    }
}
