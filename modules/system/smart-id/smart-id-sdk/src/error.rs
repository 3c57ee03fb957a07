//! Error types for the `SmartID` module.

use thiserror::Error;

/// Errors that can occur when constructing or invoking the `SmartID` filter.
///
/// A missing identifier is not an error: it is reported through
/// `FilterOutcome::NoIdentifier` so the host can render a remediation page.
#[derive(Debug, Error)]
pub enum SmartIdError {
    /// A configuration option has the wrong type or shape.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The secret salt could not be obtained or is unusable.
    #[error("secret salt unavailable: {0}")]
    SaltUnavailable(String),

    /// Authority inclusion is enabled but the request carries no authority.
    #[error("no authenticating authority available for this request")]
    UnresolvedAuthority,

    /// The module has not been initialized yet.
    #[error("smart_id module is not initialized")]
    NotInitialized,

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Reasons a single attribute value cannot serve as identifier input.
///
/// The candidate loop consumes these and moves on to the next candidate;
/// they never surface past it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value is neither a scalar nor a name identifier.
    #[error("unsupported attribute value type: {kind}")]
    UnsupportedType { kind: &'static str },

    /// The name identifier does not carry a usable persistent value.
    #[error("unsupported name identifier format: {}", format.as_deref().unwrap_or("<none>"))]
    UnsupportedFormat { format: Option<String> },
}
