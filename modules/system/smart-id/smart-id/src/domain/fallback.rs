//! Verbatim copy of a pre-existing identifier on the bypass path.

use smart_id_sdk::{AttributeBag, AttributeValue};

use super::candidate::ResolvedCandidate;

/// Copies the first populated fallback attribute without hashing it.
#[derive(Debug, Clone)]
pub struct FallbackCopier {
    candidates: Vec<String>,
}

impl FallbackCopier {
    #[must_use]
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    #[must_use]
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    #[must_use]
    pub fn copy(&self, attrs: &AttributeBag) -> Option<ResolvedCandidate> {
        self.candidates.iter().find_map(|name| {
            let value = attrs.first_value(name).and_then(verbatim)?;
            Some(ResolvedCandidate {
                name: name.clone(),
                value,
            })
        })
    }
}

/// The value as released, with no format checks: the point of this path is
/// to keep an identifier the `IdP` already guarantees to be stable.
fn verbatim(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::Scalar(s) => Some(s.clone()),
        AttributeValue::Integer(n) => Some(n.to_string()),
        AttributeValue::NameId(name_id) => Some(name_id.value.clone()).filter(|v| !v.is_empty()),
        AttributeValue::Opaque(_) => None,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use smart_id_sdk::NameId;

    #[test]
    fn copies_first_populated_fallback_verbatim() {
        let copier = FallbackCopier::new(vec!["subject-id".to_owned(), "voPersonID".to_owned()]);
        let attrs = AttributeBag::new()
            .with("subject-id", vec!["".into()])
            .with("voPersonID", vec!["xyz123@example.org".into()]);

        let got = copier.copy(&attrs).unwrap();
        assert_eq!(got.name, "voPersonID");
        assert_eq!(got.value, "xyz123@example.org");
    }

    #[test]
    fn name_ids_are_copied_regardless_of_format() {
        let copier = FallbackCopier::new(vec!["eduPersonTargetedID".to_owned()]);
        let attrs = AttributeBag::new().with(
            "eduPersonTargetedID",
            vec![NameId::new("opaque", "urn:example:format").into()],
        );
        assert_eq!(copier.copy(&attrs).unwrap().value, "opaque");
    }

    #[test]
    fn no_fallback_value_yields_none() {
        let copier = FallbackCopier::new(vec!["subject-id".to_owned()]);
        assert!(copier.copy(&AttributeBag::new()).is_none());

        let empty = FallbackCopier::new(vec![]);
        assert!(empty.copy(&AttributeBag::new()).is_none());
    }
}
