//! The registration API seam.
//!
//! [`RegistrationApi`] abstracts the two operations the sync engine needs
//! from the server, so tests can substitute an in-memory implementation for
//! the HTTP one in [`crate::http`].

use std::sync::Arc;

use async_trait::async_trait;

use alertsync_core::registration::{Registration, RegistrationId};

/// One of the four legal `PUT /registrations/{id}/` bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationUpdate {
    /// `{"resubscribe": true}` -- turn the alert back on.
    Resubscribe,
    /// `{"cancelled": true}` -- turn the alert off.
    Cancel,
    /// `{"close_notification": bool}` -- toggle the section-close notification.
    CloseNotification(bool),
    /// `{"deleted": true}` -- remove the registration.
    Delete,
}

impl RegistrationUpdate {
    /// The request body this update serializes to. No other body shapes are
    /// valid for the endpoint.
    pub fn body(self) -> serde_json::Value {
        match self {
            RegistrationUpdate::Resubscribe => serde_json::json!({ "resubscribe": true }),
            RegistrationUpdate::Cancel => serde_json::json!({ "cancelled": true }),
            RegistrationUpdate::CloseNotification(on) => {
                serde_json::json!({ "close_notification": on })
            }
            RegistrationUpdate::Delete => serde_json::json!({ "deleted": true }),
        }
    }
}

/// Errors from the registration API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Registration API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// Async boundary to the registration collection.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Fetch the full registration list (`GET /registrations/`).
    async fn list(&self) -> Result<Vec<Registration>, ApiError>;

    /// Mutate one registration (`PUT /registrations/{id}/`).
    async fn update(&self, id: RegistrationId, update: RegistrationUpdate)
        -> Result<(), ApiError>;
}

/// Shared handle to an API implementation, cloneable into background tasks.
pub type SharedApi = Arc<dyn RegistrationApi>;
