//! HTTP collaborator boundary for the registration API.
//!
//! Defines the [`RegistrationApi`](api::RegistrationApi) seam the sync engine
//! talks through, the reqwest-backed implementation for the real server, and
//! env-based client configuration.

pub mod api;
pub mod config;
pub mod http;
