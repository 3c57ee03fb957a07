//! Configuration for the `SmartID` filter.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Attributes tried, in order, when no override applies.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "eduPersonUniqueId",
    "eduPersonPrincipalName",
    "eduPersonTargetedID",
    "openid",
    "linkedin_targetedID",
    "facebook_targetedID",
    "windowslive_targetedID",
    "twitter_targetedID",
];

/// Attributes copied verbatim when an `IdP` bypasses derivation.
pub const DEFAULT_FALLBACK_CANDIDATES: &[&str] = &["subject-id", "eduPersonUniqueId", "voPersonID"];

pub const DEFAULT_ID_ATTRIBUTE: &str = "smart_id";

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_owned()).collect()
}

/// Filter configuration.
///
/// Built once per filter instance and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct SmartIdConfig {
    /// Candidate attribute names in priority order.
    pub candidates: Vec<String>,

    /// Per-authority replacement for `candidates`.
    pub authority_candidate_map: HashMap<String, Vec<String>>,

    /// Attributes copied verbatim when derivation is bypassed by `IdP` tag.
    pub cuid_candidates: Vec<String>,

    /// Name of the attribute the identifier is written to.
    pub id_attribute: String,

    /// Mix the authenticating authority into the hash input.
    pub add_authority: bool,

    /// Mix the candidate attribute name into the hash input.
    pub add_candidate: bool,

    /// Suffix appended as `@scope` to derived identifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Also set the identifier as the context's primary user id.
    pub set_userid_attribute: bool,

    /// Authorities left out of the hash input.
    pub skip_authority_list: BTreeSet<String>,

    /// Authority rename table, applied before `skip_authority_list`.
    pub authority_map: HashMap<String, String>,

    /// When non-empty, only `IdPs` carrying one of these tags get a derived id.
    pub idp_tag_whitelist: BTreeSet<String>,

    /// `IdPs` carrying any of these tags bypass derivation.
    pub idp_tag_blacklist: BTreeSet<String>,
}

impl Default for SmartIdConfig {
    fn default() -> Self {
        Self {
            candidates: owned(DEFAULT_CANDIDATES),
            authority_candidate_map: HashMap::new(),
            cuid_candidates: owned(DEFAULT_FALLBACK_CANDIDATES),
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_owned(),
            add_authority: true,
            add_candidate: true,
            scope: None,
            set_userid_attribute: true,
            skip_authority_list: BTreeSet::new(),
            authority_map: HashMap::new(),
            idp_tag_whitelist: BTreeSet::new(),
            idp_tag_blacklist: BTreeSet::new(),
        }
    }
}

impl SmartIdConfig {
    /// Parse and validate the raw module configuration.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if an option has the wrong type, an unknown option is
    /// present, or [`SmartIdConfig::validate`] rejects the result.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, DomainError> {
        let cfg = Self::deserialize(value).map_err(DomainError::invalid_config)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check shape constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on an empty candidate list (default or override),
    /// an empty output attribute name, or an empty scope.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.candidates.is_empty() {
            return Err(DomainError::invalid_config("`candidates` must not be empty"));
        }
        if let Some((authority, _)) = self
            .authority_candidate_map
            .iter()
            .find(|(_, list)| list.is_empty())
        {
            return Err(DomainError::invalid_config(format!(
                "`authority_candidate_map` entry for '{authority}' must not be empty"
            )));
        }
        if self.id_attribute.trim().is_empty() {
            return Err(DomainError::invalid_config("`id_attribute` must not be empty"));
        }
        if self.scope.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(DomainError::invalid_config("`scope` must not be empty when set"));
        }
        Ok(())
    }
}
