//! Candidate attribute selection.

use std::collections::HashMap;

use smart_id_sdk::{AttributeBag, AttributeValue, NameId, ValueError};
use tracing::debug;

use crate::config::SmartIdConfig;

/// Attribute chosen as identifier input, with its normalized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCandidate {
    pub name: String,
    pub value: String,
}

/// Selects the first usable attribute from a priority-ordered list.
#[derive(Debug, Clone)]
pub struct CandidateResolver {
    candidates: Vec<String>,
    overrides: HashMap<String, Vec<String>>,
}

impl CandidateResolver {
    #[must_use]
    pub fn new(candidates: Vec<String>, overrides: HashMap<String, Vec<String>>) -> Self {
        Self {
            candidates,
            overrides,
        }
    }

    #[must_use]
    pub fn from_config(cfg: &SmartIdConfig) -> Self {
        Self::new(cfg.candidates.clone(), cfg.authority_candidate_map.clone())
    }

    /// The list in effect for `authority`.
    #[must_use]
    pub fn effective_candidates(&self, authority: Option<&str>) -> &[String] {
        authority
            .and_then(|a| self.overrides.get(a))
            .unwrap_or(&self.candidates)
    }

    /// First candidate with a populated, normalizable value.
    ///
    /// Values that fail normalization are skipped; later candidates are not
    /// looked at once one succeeds.
    #[must_use]
    pub fn resolve(
        &self,
        attrs: &AttributeBag,
        authority: Option<&str>,
    ) -> Option<ResolvedCandidate> {
        self.effective_candidates(authority).iter().find_map(|name| {
            let value = attrs.first_value(name)?;
            match normalize(value) {
                Ok(value) => Some(ResolvedCandidate {
                    name: name.clone(),
                    value,
                }),
                Err(e) => {
                    debug!(candidate = %name, error = %e, "skipping candidate attribute");
                    None
                }
            }
        })
    }
}

/// Render an attribute value as identifier input.
///
/// # Errors
///
/// - `UnsupportedFormat` for a name identifier that is not persistent or has
///   no value
/// - `UnsupportedType` for anything that is neither a scalar nor a name
///   identifier
pub fn normalize(value: &AttributeValue) -> Result<String, ValueError> {
    match value {
        AttributeValue::Scalar(s) => Ok(s.clone()),
        AttributeValue::Integer(n) => Ok(n.to_string()),
        AttributeValue::NameId(name_id) if usable(name_id) => Ok(name_id.value.clone()),
        AttributeValue::NameId(name_id) => Err(ValueError::UnsupportedFormat {
            format: name_id.format.clone(),
        }),
        AttributeValue::Opaque(other) => Err(ValueError::UnsupportedType {
            kind: json_kind(other),
        }),
    }
}

fn usable(name_id: &NameId) -> bool {
    name_id.is_persistent() && !name_id.value.is_empty()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
