//! Error types for driftsync

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Desired-state spec violates the input contract for its resource kind
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Provider client could not be constructed or authenticated
    #[error("provider authentication failed: {0}")]
    AuthError(String),

    /// A provider call failed during reconciliation
    #[error("provider call failed at {step}: {message}")]
    ProviderError { step: &'static str, message: String },

    /// Resource is absent on the provider side
    #[error("resource not found")]
    NotFound,

    /// Provider returned a non-success HTTP status
    #[error("provider returned HTTP {status}: {message}")]
    ApiError { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Fold a failure into a `ProviderError` carrying the reconciliation
    /// step it occurred in. Errors that already identify their origin
    /// (spec validation, authentication, an earlier step) pass through.
    pub fn at_step(self, step: &'static str) -> Self {
        match self {
            Error::InvalidSpec(_) | Error::AuthError(_) | Error::ProviderError { .. } => self,
            other => Error::ProviderError {
                step,
                message: other.to_string(),
            },
        }
    }

    /// True when the error marks provider-side absence
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_step_wraps_ambient_errors() {
        let err = Error::ApiError {
            status: 500,
            message: "boom".to_string(),
        }
        .at_step("create_service");

        match err {
            Error::ProviderError { step, message } => {
                assert_eq!(step, "create_service");
                assert!(message.contains("500"));
                assert!(message.contains("boom"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_at_step_preserves_existing_step() {
        let err = Error::ProviderError {
            step: "create_domain",
            message: "bad domain".to_string(),
        }
        .at_step("activate_version");

        match err {
            Error::ProviderError { step, .. } => assert_eq!(step, "create_domain"),
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_at_step_wraps_not_found() {
        // Absence is only meaningful where the caller checks for it first;
        // everywhere else it is a provider failure like any other.
        let err = Error::NotFound.at_step("create_mount_target");
        assert!(matches!(err, Error::ProviderError { .. }));
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::NotFound.is_not_found());
        assert!(!Error::InvalidSpec("x".to_string()).is_not_found());
    }
}
