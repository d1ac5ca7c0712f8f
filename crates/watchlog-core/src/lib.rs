//! watchlog-core - Session layer for the watchlog movie-list client
//!
//! This crate holds everything with non-trivial state or failure contracts:
//!
//! - **session**: authentication state, login/registration/logout, and the
//!   generic authenticated request wrapper every consumer goes through
//! - **store**: persisted token + profile under fixed keys
//! - **normalize**: backend primary-key convention rewriting
//! - **guard**: pure routing decisions derived from session state
//! - **config**: API endpoint and storage locations
//!
//! Consumers (the CLI, or any other front end) construct one
//! [`SessionManager`] at startup, call [`SessionManager::restore`] once, and
//! route every API call through it.

pub mod config;
pub mod error;
pub mod guard;
pub mod normalize;
pub mod notify;
pub mod session;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use reqwest::Method;
pub use session::{SessionManager, SessionSnapshot};
