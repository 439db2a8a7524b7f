//! Application state for the fruitbowl prompt.
//!
//! `App` wires the session store, request gateway, navigator and catalog
//! together and executes parsed commands against them.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use fruitbowl_core::router::DEFAULT_LANDING_PATH;
use fruitbowl_core::{
    ApiClient, ApiError, Config, FruitCatalog, Navigation, NavigationGuard, Navigator, RouteTable,
    SessionStorage, SessionStore,
};

use crate::input::{Command, HELP};
use crate::render::{render_fruits, render_page};

/// Route that shows the editable catalog.
const UPDATE_PATH: &str = "/update";

const EMAIL_ENV: &str = "FRUITBOWL_EMAIL";
const PASSWORD_ENV: &str = "FRUITBOWL_PASSWORD";

/// Reads one line of user input. `secret` turns echo off.
pub type Prompter = fn(&str, bool) -> io::Result<String>;

pub struct App {
    pub config: Config,
    /// Where `last_email` is written back; `None` leaves the config untouched.
    config_path: Option<PathBuf>,
    pub api: ApiClient,
    pub navigator: Navigator,
    pub catalog: FruitCatalog,
    pub status_message: Option<String>,
    prompter: Prompter,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let storage = config.session_storage()?;
        let base_url = config.api_base_url();
        let mut app = Self::with_storage(config, storage, &base_url)?;
        app.config_path = Config::config_path().ok();
        Ok(app)
    }

    /// Build against an explicit session storage and API base URL.
    pub fn with_storage(
        config: Config,
        storage: Arc<dyn SessionStorage>,
        base_url: &str,
    ) -> Result<Self> {
        let session = Arc::new(SessionStore::open(storage));
        debug!(authenticated = session.is_authenticated(), "Session opened");

        let api = ApiClient::new(base_url, session.clone())?;
        info!(base_url = %base_url, "API client configured");

        let navigator = Navigator::new(NavigationGuard::new(session, RouteTable::default()));
        let catalog = FruitCatalog::new(api.clone());

        Ok(Self {
            config,
            config_path: None,
            api,
            navigator,
            catalog,
            status_message: None,
            prompter: terminal_prompt,
        })
    }

    pub fn with_prompter(mut self, prompter: Prompter) -> Self {
        self.prompter = prompter;
        self
    }

    fn session(&self) -> &Arc<SessionStore> {
        self.api.session()
    }

    /// Land on the dashboard, which the guard may turn into the login page.
    pub async fn start(&mut self) {
        self.go(DEFAULT_LANDING_PATH).await;
    }

    pub fn render(&self) -> String {
        let mut page = render_page(self.navigator.current(), self.session(), &self.catalog);
        if let Some(ref message) = self.status_message {
            page.push_str(message);
            page.push('\n');
        }
        page
    }

    pub fn prompt(&self) -> String {
        format!("{}> ", self.navigator.location())
    }

    /// Execute one command. Returns true when the user asked to quit.
    pub async fn handle(&mut self, command: Command) -> Result<bool> {
        self.status_message = None;
        match command {
            Command::Empty => {}
            Command::Login(email) => self.login(email).await,
            Command::Logout => {
                self.navigator.logout();
                self.catalog.clear();
                self.status_message = Some("Logged out.".to_string());
            }
            Command::Go(path) => self.go(&path).await,
            Command::Routes => {
                let lines: Vec<String> = self
                    .navigator
                    .guard()
                    .routes()
                    .routes()
                    .iter()
                    .map(|r| {
                        let lock = if r.requires_authentication { " (login required)" } else { "" };
                        format!("{:<12} {}{}", r.path, r.name, lock)
                    })
                    .collect();
                self.status_message = Some(lines.join("\n"));
            }
            Command::List => self.go(DEFAULT_LANDING_PATH).await,
            Command::Add(input) => {
                if self.enter(UPDATE_PATH) {
                    let result = self.catalog.create(&input).await;
                    self.report(result, &format!("Added {}.", input.name));
                }
            }
            Command::Edit(id, input) => {
                if self.enter(UPDATE_PATH) {
                    let result = self.catalog.update(id, &input).await;
                    self.report(result, &format!("Updated #{}.", id));
                }
            }
            Command::Remove(id) => {
                if self.enter(UPDATE_PATH) {
                    let result = self.catalog.delete(id).await;
                    self.report(result, &format!("Deleted #{}.", id));
                }
            }
            Command::Search(query) => {
                if self.enter(DEFAULT_LANDING_PATH) {
                    match self.catalog.search(&query).await {
                        Ok(found) => {
                            self.status_message = Some(format!(
                                "{} match(es) for \"{}\":\n{}",
                                found.len(),
                                query,
                                render_fruits(&found, true).trim_end()
                            ));
                        }
                        Err(e) => self.handle_api_error(e),
                    }
                }
            }
            Command::WhoAmI => {
                self.status_message = Some(match self.session().data() {
                    Some(data) => format!(
                        "{} (since {})",
                        data.email,
                        data.created_at.format("%Y-%m-%d %H:%M UTC")
                    ),
                    None => "Not logged in.".to_string(),
                });
            }
            Command::Help => self.status_message = Some(HELP.to_string()),
            Command::Quit => return Ok(true),
        }
        Ok(false)
    }

    /// Navigate and load the catalog when the page shows it.
    async fn go(&mut self, path: &str) {
        if self.enter(path) && self.navigator.current().requires_authentication {
            if let Err(e) = self.catalog.refresh().await {
                self.handle_api_error(e);
            }
        }
    }

    /// Navigate through the guard. False when the user did not land on `path`.
    fn enter(&mut self, path: &str) -> bool {
        match self.navigator.navigate(path) {
            Ok(Navigation::Allowed(_)) => true,
            Ok(Navigation::Redirected { .. }) => {
                self.status_message = Some("Please log in first.".to_string());
                false
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                false
            }
        }
    }

    async fn login(&mut self, email: Option<String>) {
        let (email, password) = match self.read_credentials(email) {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!(error = %e, "Failed to read credentials");
                self.status_message = Some(format!("Could not read credentials: {}", e));
                return;
            }
        };

        match self.navigator.login(&self.api, &email, &password).await {
            Ok(landed) => {
                self.config.last_email = Some(email.trim().to_string());
                if let Some(ref path) = self.config_path {
                    if let Err(e) = self.config.save_to(path) {
                        warn!(error = %e, "Failed to save config");
                    }
                }
                self.status_message = Some("Login successful.".to_string());
                if landed.requires_authentication {
                    if let Err(e) = self.catalog.refresh().await {
                        self.handle_api_error(e);
                    }
                }
            }
            Err(e) => {
                self.status_message = Some(e.user_message());
            }
        }
    }

    /// Email from the command, the environment or the last login, else
    /// prompted. Password from the environment, else prompted without echo.
    fn read_credentials(&self, email: Option<String>) -> io::Result<(String, String)> {
        let email = match email
            .or_else(|| std::env::var(EMAIL_ENV).ok())
            .or_else(|| self.config.last_email.clone())
        {
            Some(email) => email,
            None => (self.prompter)("Email: ", false)?,
        };
        let password = match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => password,
            _ => (self.prompter)(&format!("Password for {}: ", email), true)?,
        };
        Ok((email, password))
    }

    fn report(&mut self, result: Result<(), ApiError>, success: &str) {
        match result {
            Ok(()) => self.status_message = Some(success.to_string()),
            Err(e) => self.handle_api_error(e),
        }
    }

    /// A rejected token has already ended the session; move off the page.
    fn handle_api_error(&mut self, e: ApiError) {
        if e.is_unauthorized() {
            self.catalog.clear();
            self.navigator.revalidate();
            self.status_message = Some(e.to_string());
        } else {
            self.status_message = Some(format!("Request failed: {}", e));
        }
    }
}

fn terminal_prompt(label: &str, secret: bool) -> io::Result<String> {
    if secret {
        return rpassword::prompt_password(label);
    }
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
