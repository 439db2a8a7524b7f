use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No route declared for {0}")]
    UnknownRoute(String),

    #[error("Route table has no login route at {0}")]
    MissingLoginRoute(String),
}
