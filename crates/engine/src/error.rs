use alertsync_client::api::ApiError;
use alertsync_core::error::CoreError;
use alertsync_core::registration::RegistrationId;

/// One registration's failure inside a batch wave.
#[derive(Debug, Clone)]
pub struct BatchItemFailure {
    pub id: RegistrationId,
    pub reason: String,
}

/// Errors surfaced by the sync engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A locally detected invalid transition; never reached the network.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The network request failed or the server rejected the mutation.
    /// The cache's last-known-good list is preserved.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// At least one request in a batch wave failed. Mutations that already
    /// landed server-side are not rolled back.
    #[error("Batch failed for {} of {attempted} registrations", failures.len())]
    PartialFailure {
        /// How many registrations the batch targeted.
        attempted: usize,
        /// The per-registration failures.
        failures: Vec<BatchItemFailure>,
    },
}
