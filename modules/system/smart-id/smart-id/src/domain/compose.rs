//! Canonical identifier input and final identifier assembly.

use smart_id_sdk::Salt;

use super::candidate::ResolvedCandidate;
use super::hash;

/// Unsalted, human-diagnosable form of the identifier input:
/// `[name ":"] value ["!" authority]`.
///
/// The same string is the hash pre-image, so logging it lets operators
/// explain an identifier without ever seeing the salt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedInput {
    external_form: String,
}

impl ComposedInput {
    #[must_use]
    pub fn external_form(&self) -> &str {
        &self.external_form
    }

    #[must_use]
    pub fn preimage(&self) -> &str {
        &self.external_form
    }

    /// Salted digest, suffixed with `@scope` when a scope is set.
    #[must_use]
    pub fn finish(&self, salt: &Salt, scope: Option<&str>) -> String {
        let mut identifier = hash::digest(self.preimage(), salt);
        if let Some(scope) = scope {
            identifier.push('@');
            identifier.push_str(scope);
        }
        identifier
    }
}

/// Build the identifier input from the resolved candidate and authority.
#[must_use]
pub fn compose(
    candidate: &ResolvedCandidate,
    authority: Option<&str>,
    add_candidate: bool,
) -> ComposedInput {
    let mut external_form = String::new();
    if add_candidate {
        external_form.push_str(&candidate.name);
        external_form.push(':');
    }
    external_form.push_str(&candidate.value);
    if let Some(authority) = authority {
        external_form.push('!');
        external_form.push_str(authority);
    }
    ComposedInput { external_form }
}
