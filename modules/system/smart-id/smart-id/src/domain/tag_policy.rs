//! `IdP` tag based selection between full derivation and bypass.

use std::collections::BTreeSet;

use crate::config::SmartIdConfig;

/// Why an `IdP` was routed to the bypass path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BypassReason {
    /// The `IdP` carries a deny-listed tag.
    DenyListed { tag: String },
    /// An allow-list is configured and the `IdP` carries none of its tags.
    NotAllowListed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDecision {
    Full,
    Bypass(BypassReason),
}

/// Allow/deny lists over `IdP` tags. The deny-list always wins.
#[derive(Debug, Clone, Default)]
pub struct TagPolicy {
    allow: BTreeSet<String>,
    deny: BTreeSet<String>,
}

impl TagPolicy {
    #[must_use]
    pub fn new(allow: BTreeSet<String>, deny: BTreeSet<String>) -> Self {
        Self { allow, deny }
    }

    #[must_use]
    pub fn from_config(cfg: &SmartIdConfig) -> Self {
        Self::new(cfg.idp_tag_whitelist.clone(), cfg.idp_tag_blacklist.clone())
    }

    #[must_use]
    pub fn decide(&self, idp_tags: &BTreeSet<String>) -> TagDecision {
        if let Some(tag) = self.deny.intersection(idp_tags).next() {
            return TagDecision::Bypass(BypassReason::DenyListed { tag: tag.clone() });
        }
        if !self.allow.is_empty() && self.allow.is_disjoint(idp_tags) {
            return TagDecision::Bypass(BypassReason::NotAllowListed);
        }
        TagDecision::Full
    }
}
