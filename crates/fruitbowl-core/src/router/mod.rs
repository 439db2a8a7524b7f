//! Route protection.
//!
//! - `RouteTable`: static path → route metadata, built once at startup
//! - `NavigationGuard`: decides `Allowed` / `Redirected` for each transition
//! - `Navigator`: tracks the current location and ties login/logout to
//!   navigation

pub mod error;
pub mod guard;
pub mod navigator;
pub mod routes;

pub use error::NavigationError;
pub use guard::{Navigation, NavigationGuard};
pub use navigator::{Navigator, DEFAULT_LANDING_PATH};
pub use routes::{Route, RouteTable, LOGIN_PATH};
