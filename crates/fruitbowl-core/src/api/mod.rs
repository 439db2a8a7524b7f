//! REST API client module for the fruits service.
//!
//! This module provides the `ApiClient` request gateway. All catalog calls
//! carry the session's bearer token, and a 401 from any of them ends the
//! session. The client also implements `Authenticator`, posting credentials
//! to the `/login` endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
