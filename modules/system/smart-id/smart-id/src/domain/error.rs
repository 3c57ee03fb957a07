//! Domain errors for the `SmartID` filter.

use std::fmt;

use smart_id_sdk::SmartIdError;

/// Internal domain errors.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("secret salt unavailable: {0}")]
    SaltUnavailable(String),

    #[error("authority inclusion is enabled but the request has no authenticating authority")]
    UnresolvedAuthority,
}

impl DomainError {
    pub fn invalid_config(reason: impl fmt::Display) -> Self {
        Self::InvalidConfig(reason.to_string())
    }

    pub fn salt_unavailable(reason: impl fmt::Display) -> Self {
        Self::SaltUnavailable(reason.to_string())
    }
}

impl From<DomainError> for SmartIdError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidConfig(msg) => Self::Configuration(msg),
            DomainError::SaltUnavailable(msg) => Self::SaltUnavailable(msg),
            DomainError::UnresolvedAuthority => Self::UnresolvedAuthority,
        }
    }
}
