use thiserror::Error;

/// Failures of the authentication subsystem.
///
/// Login failures are returned to the caller for display; none of them are
/// ever fatal. `Unauthorized` is raised by the request gateway when a
/// previously accepted token is rejected mid-session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unable to reach the authentication server: {0}")]
    Unreachable(String),

    #[error("Session rejected by the server - please log in again")]
    Unauthorized,

    #[error("Malformed authentication response: {0}")]
    MalformedResponse(String),

    #[error("Email and password required")]
    MissingCredentials,

    #[error("A login request is already in progress")]
    LoginInProgress,
}

impl AuthError {
    /// User-facing message for the login form.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Unreachable(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}
