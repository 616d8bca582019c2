//! Authgate — token-issuing authentication gateway.
//!
//! Intercepts every inbound request: exchanges `(username, access key)`
//! credentials for bearer tokens, validates presented tokens against a
//! 2-day retention window, authorizes the caller against their account, and
//! forwards authorized requests with an attached identity context.

pub mod app;
pub mod auth;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod store;

pub use app::AppState;
