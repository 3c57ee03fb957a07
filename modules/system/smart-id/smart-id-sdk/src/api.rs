//! Public API trait for the `SmartID` filter.
//!
//! This trait defines the interface the hosting authentication pipeline
//! uses to run the filter against one authentication event.

use async_trait::async_trait;

use crate::error::SmartIdError;
use crate::models::{AuthContext, FilterOutcome};

/// Public API trait for the `SmartID` filter.
///
/// The module hands out an `Arc<dyn IdentifierFilterClient>` after
/// initialization; the pipeline calls it once per authentication event:
///
/// ```ignore
/// let filter = module.client()?;
///
/// match filter.process(&mut ctx).await? {
///     FilterOutcome::Identified(id) => { /* continue the pipeline */ }
///     FilterOutcome::NoIdentifier(report) => { /* render remediation page */ }
/// }
/// ```
///
/// The implementation is shared across concurrent requests and never
/// mutates its own state; the only write target is the supplied context.
#[async_trait]
pub trait IdentifierFilterClient: Send + Sync {
    /// Derive (or copy) the principal's identifier and write it into `ctx`.
    ///
    /// On [`FilterOutcome::Identified`] the configured output attribute holds
    /// a one-element list with the identifier, and the context's primary
    /// user id is set when the filter is configured to do so.
    /// On [`FilterOutcome::NoIdentifier`] the context is left untouched.
    ///
    /// # Errors
    ///
    /// - `UnresolvedAuthority` if authority inclusion is enabled but the
    ///   context carries no authenticating authority
    /// - `Internal` for unexpected errors
    async fn process(&self, ctx: &mut AuthContext) -> Result<FilterOutcome, SmartIdError>;
}
