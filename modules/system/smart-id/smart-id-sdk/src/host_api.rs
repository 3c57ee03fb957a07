//! Collaborator traits implemented by the hosting environment.

use crate::error::SmartIdError;
use crate::models::{IdpDescriptor, Salt};

/// Supplies the secret salt mixed into every derived identifier.
///
/// Called once when the module is initialized; the salt is kept for the
/// lifetime of the filter and never appears in logs or errors.
pub trait SaltProvider: Send + Sync {
    /// Load the salt.
    ///
    /// # Errors
    ///
    /// `SaltUnavailable` if the host has no salt configured.
    fn load_salt(&self) -> Result<Salt, SmartIdError>;
}

/// `IdP` metadata lookup by entity id.
///
/// Used when the authenticating `IdP` sits behind a bridging proxy, so the
/// descriptor attached to the context belongs to the proxy rather than to
/// the `IdP` whose tags and contacts matter.
pub trait IdpMetadataSource: Send + Sync {
    fn idp_descriptor(&self, entity_id: &str) -> Option<IdpDescriptor>;
}
