//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the single owner of authentication state (login/logout)
//! - `SessionStorage`: durable key-value slot the session is persisted in,
//!   with file, keychain and in-memory backends
//! - `AuthError`: failures surfaced by login and by mid-session rejection
//!
//! A session is rehydrated from storage once at startup and lives until
//! `logout` clears it, either explicitly or after the server rejects the
//! token with a 401.

pub mod error;
pub mod keychain;
pub mod session;
pub mod storage;

pub use error::AuthError;
pub use keychain::KeyringStorage;
pub use session::{Authenticator, SessionData, SessionStore, SESSION_KEY};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
