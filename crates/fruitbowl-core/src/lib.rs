//! Core library for fruitbowl.
//!
//! The session subsystem is split in three parts that share one
//! [`auth::SessionStore`]:
//! - [`auth`]: login/logout and persistence of the bearer token
//! - [`api`]: the request gateway that decorates outgoing calls with the
//!   token and ends the session on a 401
//! - [`router`]: the navigation guard that keeps unauthenticated users out
//!   of protected routes
//!
//! [`catalog`] and [`models`] cover the fruit catalog served by the same API.

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod models;
pub mod router;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, Authenticator, SessionData, SessionStorage, SessionStore};
pub use catalog::FruitCatalog;
pub use config::Config;
pub use router::{Navigation, NavigationError, NavigationGuard, Navigator, Route, RouteTable};
