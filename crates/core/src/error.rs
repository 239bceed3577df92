use crate::registration::RegistrationId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Registration not found: {0}")]
    NotFound(RegistrationId),

    #[error("Registration {0} is inactive: turn the alert on before changing its close notification")]
    InactiveAlert(RegistrationId),
}
