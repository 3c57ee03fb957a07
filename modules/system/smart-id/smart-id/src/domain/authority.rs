//! Authenticating-authority resolution.

use std::collections::{BTreeSet, HashMap};

use smart_id_sdk::AuthorityChain;
use tracing::debug;

use super::DomainError;
use crate::config::SmartIdConfig;

/// Picks the authority that goes into the identifier input.
///
/// The last element of the chain is remapped first; the exclusion list is
/// checked against the remapped value.
#[derive(Debug, Clone)]
pub struct AuthorityResolver {
    add_authority: bool,
    remap: HashMap<String, String>,
    excluded: BTreeSet<String>,
}

impl AuthorityResolver {
    #[must_use]
    pub fn new(
        add_authority: bool,
        remap: HashMap<String, String>,
        excluded: BTreeSet<String>,
    ) -> Self {
        Self {
            add_authority,
            remap,
            excluded,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &SmartIdConfig) -> Self {
        Self::new(
            cfg.add_authority,
            cfg.authority_map.clone(),
            cfg.skip_authority_list.clone(),
        )
    }

    /// Resolve the authority for one request.
    ///
    /// Returns `Ok(None)` when authority inclusion is off or the authority is
    /// excluded by policy.
    ///
    /// # Errors
    ///
    /// `UnresolvedAuthority` if inclusion is on and the chain is empty.
    pub fn resolve(&self, chain: &AuthorityChain) -> Result<Option<String>, DomainError> {
        if !self.add_authority {
            return Ok(None);
        }

        let raw = chain.last().ok_or(DomainError::UnresolvedAuthority)?;
        let authority = match self.remap.get(raw) {
            Some(mapped) => {
                debug!(from = raw, to = %mapped, "remapped authenticating authority");
                mapped.as_str()
            }
            None => raw,
        };

        if self.excluded.contains(authority) {
            debug!(authority, "authority excluded from identifier input");
            return Ok(None);
        }

        Ok(Some(authority.to_owned()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    const OLD: &str = "https://old.org";
    const NEW: &str = "https://new.org";

    fn chain(items: &[&str]) -> AuthorityChain {
        items.iter().copied().collect()
    }

    fn resolver(remap: &[(&str, &str)], excluded: &[&str]) -> AuthorityResolver {
        AuthorityResolver::new(
            true,
            remap
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            excluded.iter().map(|s| (*s).to_owned()).collect(),
        )
    }

    #[test]
    fn uses_last_authority_of_chain() {
        let r = resolver(&[], &[]);
        let got = r
            .resolve(&chain(&["https://proxy.example.org", "https://idp.example.org"]))
            .unwrap();
        assert_eq!(got.as_deref(), Some("https://idp.example.org"));
    }

    #[test]
    fn disabled_inclusion_is_always_absent() {
        let r = AuthorityResolver::new(false, HashMap::new(), BTreeSet::new());
        assert_eq!(
            r.resolve(&chain(&["https://idp.example.org"])).unwrap(),
            None
        );
        assert_eq!(r.resolve(&AuthorityChain::new()).unwrap(), None);
    }

    #[test]
    fn empty_chain_is_an_error_when_inclusion_is_on() {
        let r = resolver(&[], &[]);
        assert!(matches!(
            r.resolve(&AuthorityChain::new()),
            Err(DomainError::UnresolvedAuthority)
        ));
    }

    #[test]
    fn remap_substitutes_authority() {
        let r = resolver(&[(OLD, NEW)], &[]);
        let got = r.resolve(&chain(&[OLD])).unwrap();
        assert_eq!(got.as_deref(), Some(NEW));
    }

    #[test]
    fn exclusion_is_checked_after_remap() {
        let r = resolver(&[(OLD, NEW)], &[NEW]);
        assert_eq!(r.resolve(&chain(&[OLD])).unwrap(), None);

        // The raw value alone is not excluded once it has been remapped away.
        let r = resolver(&[(OLD, NEW)], &[OLD]);
        let got = r.resolve(&chain(&[OLD])).unwrap();
        assert_eq!(got.as_deref(), Some(NEW));
    }
}
