//! Salted SHA-256 digest over the composed identifier input.

use sha2::{Digest, Sha256};
use smart_id_sdk::Salt;

use super::DomainError;

/// Placeholder salt shipped in sample deployments; never valid for real use.
pub const PLACEHOLDER_SALT: &[u8] = b"defaultsecretsalt";

/// Lowercase hex SHA-256 of `preimage + "!" + salt`.
#[must_use]
pub fn digest(preimage: &str, salt: &Salt) -> String {
    let mut hasher = Sha256::new();
    hasher.update(preimage.as_bytes());
    hasher.update(b"!");
    hasher.update(salt.expose());
    hex::encode(hasher.finalize())
}

/// Reject salts that would make identifiers recomputable by anyone.
///
/// # Errors
///
/// `SaltUnavailable` if the salt is empty or still the sample placeholder.
pub fn check_salt(salt: &Salt) -> Result<(), DomainError> {
    let bytes = salt.expose();
    if bytes.is_empty() {
        return Err(DomainError::salt_unavailable("secret salt is empty"));
    }
    if bytes == PLACEHOLDER_SALT {
        return Err(DomainError::salt_unavailable(
            "secret salt is still set to the sample placeholder",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_known_vector() {
        assert_eq!(
            digest("abc", &Salt::new("salt")),
            "1780099e29d4a4f35cd0ae05e9ace2cb7a35216de79ff19954b06db9dd3fc792"
        );
    }

    #[test]
    fn digest_is_deterministic_and_lowercase_hex() {
        let salt = Salt::new("s3cr3t");
        let a = digest("eduPersonPrincipalName:alice@example.org", &salt);
        let b = digest("eduPersonPrincipalName:alice@example.org", &salt);

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        let lower_hex = |c: char| c.is_ascii_digit() || ('a'..='f').contains(&c);
        assert!(a.chars().all(lower_hex));
    }

    #[test]
    fn digest_changes_with_salt() {
        let a = digest("eduPersonPrincipalName:alice@example.org", &Salt::new("one"));
        let b = digest("eduPersonPrincipalName:alice@example.org", &Salt::new("two"));
        assert_ne!(a, b);
    }

    #[test]
    fn placeholder_and_empty_salts_are_rejected() {
        assert!(matches!(
            check_salt(&Salt::new("")),
            Err(DomainError::SaltUnavailable(_))
        ));
        assert!(matches!(
            check_salt(&Salt::new("defaultsecretsalt")),
            Err(DomainError::SaltUnavailable(_))
        ));
        assert!(check_salt(&Salt::new("s3cr3t")).is_ok());
    }
}
