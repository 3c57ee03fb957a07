//! Domain models for the `SmartID` module.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use secrecy::{ExposeSecret, SecretSlice};
use serde::{Deserialize, Serialize};

/// SAML 2.0 persistent name identifier format.
pub const NAMEID_FORMAT_PERSISTENT: &str = "urn:oasis:names:tc:SAML:2.0:nameid-format:persistent";

/// Language used when the requested one has no display name.
const DEFAULT_LANGUAGE: &str = "en";

/// SAML Name ID carried as an attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameId {
    /// The actual identifier value.
    pub value: String,

    /// The format of the name identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// The security or administrative domain that qualifies the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_qualifier: Option<String>,

    /// The service provider's entity ID that qualifies the name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sp_name_qualifier: Option<String>,
}

impl NameId {
    /// Creates a name ID with the given value and format.
    #[must_use]
    pub fn new(value: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            format: Some(format.into()),
            name_qualifier: None,
            sp_name_qualifier: None,
        }
    }

    /// Creates a persistent name ID.
    #[must_use]
    pub fn persistent(value: impl Into<String>) -> Self {
        Self::new(value, NAMEID_FORMAT_PERSISTENT)
    }

    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.format.as_deref() == Some(NAMEID_FORMAT_PERSISTENT)
    }
}

/// A single attribute value as released by the `IdP`.
///
/// Hosts usually hand attributes over as JSON; any JSON value converts
/// into one of these variants, so a malformed value never rejects the whole
/// attribute bag. Values with no identifier interpretation end up as
/// [`AttributeValue::Opaque`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum AttributeValue {
    Scalar(String),
    /// Any JSON integer, signed or unsigned; never a float.
    Integer(serde_json::Number),
    NameId(NameId),
    Opaque(serde_json::Value),
}

impl AttributeValue {
    /// Whether the value counts as "present" for candidate selection.
    ///
    /// Empty strings and nulls are treated like a missing attribute.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        match self {
            Self::Scalar(s) => !s.is_empty(),
            Self::Opaque(v) => !v.is_null(),
            Self::Integer(_) | Self::NameId(_) => true,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Integer(value.into())
    }
}

impl From<NameId> for AttributeValue {
    fn from(value: NameId) -> Self {
        Self::NameId(value)
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::Scalar(s),
            serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer(n),
            serde_json::Value::Object(map) if map.contains_key("value") => {
                let raw = serde_json::Value::Object(map);
                match serde_json::from_value::<NameId>(raw.clone()) {
                    Ok(name_id) => Self::NameId(name_id),
                    Err(_) => Self::Opaque(raw),
                }
            }
            other => Self::Opaque(other),
        }
    }
}

impl From<AttributeValue> for serde_json::Value {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Scalar(s) => Self::String(s),
            AttributeValue::Integer(n) => Self::Number(n),
            AttributeValue::NameId(name_id) => {
                let mut map = serde_json::Map::new();
                map.insert("value".to_owned(), Self::String(name_id.value));
                let optional = [
                    ("format", name_id.format),
                    ("name_qualifier", name_id.name_qualifier),
                    ("sp_name_qualifier", name_id.sp_name_qualifier),
                ];
                for (key, field) in optional {
                    if let Some(field) = field {
                        map.insert(key.to_owned(), Self::String(field));
                    }
                }
                Self::Object(map)
            }
            AttributeValue::Opaque(v) => v,
        }
    }
}

/// Attributes released for the principal, keyed by attribute name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeBag(BTreeMap<String, Vec<AttributeValue>>);

impl AttributeBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All values of an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[AttributeValue]> {
        self.0.get(name).map(Vec::as_slice)
    }

    /// First value of an attribute, if it is populated.
    #[must_use]
    pub fn first_value(&self, name: &str) -> Option<&AttributeValue> {
        self.0
            .get(name)
            .and_then(|values| values.first())
            .filter(|value| value.is_populated())
    }

    /// Replace the values of an attribute, returning the previous ones.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        values: Vec<AttributeValue>,
    ) -> Option<Vec<AttributeValue>> {
        self.0.insert(name.into(), values)
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        self.insert(name, values);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<AttributeValue>)> for AttributeBag {
    fn from_iter<T: IntoIterator<Item = (K, Vec<AttributeValue>)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Chain of proxying authorities; the last element authenticated the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorityChain(Vec<String>);

impl AuthorityChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The authenticating authority for this request.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AuthorityChain {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// `IdP` display name, either a single string or one entry per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayName {
    Plain(String),
    Localized(BTreeMap<String, String>),
}

impl DisplayName {
    /// Pick the name for `language`, falling back to English, then to any
    /// available translation.
    #[must_use]
    pub fn resolve(&self, language: Option<&str>) -> Option<&str> {
        let name = match self {
            Self::Plain(name) => Some(name.as_str()),
            Self::Localized(names) => language
                .and_then(|lang| names.get(lang))
                .or_else(|| names.get(DEFAULT_LANGUAGE))
                .or_else(|| names.values().next())
                .map(String::as_str),
        };
        name.filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Technical,
    Support,
    Administrative,
    Billing,
    #[serde(other)]
    Other,
}

/// Metadata contact person of an `IdP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub contact_type: ContactType,
    /// Address as published in metadata, possibly a `mailto:` URI.
    pub email_address: String,
}

impl Contact {
    #[must_use]
    pub fn new(contact_type: ContactType, email_address: impl Into<String>) -> Self {
        Self {
            contact_type,
            email_address: email_address.into(),
        }
    }

    /// Bare e-mail address without a `mailto:` prefix.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email_address
            .strip_prefix("mailto:")
            .unwrap_or(&self.email_address)
    }
}

/// Metadata of the `IdP` that authenticated the principal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdpDescriptor {
    pub entity_id: String,
    pub tags: BTreeSet<String>,
    pub display_name: Option<DisplayName>,
    pub contacts: Vec<Contact>,
}

impl IdpDescriptor {
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: DisplayName) -> Self {
        self.display_name = Some(display_name);
        self
    }

    #[must_use]
    pub fn with_contact(mut self, contact: Contact) -> Self {
        self.contacts.push(contact);
        self
    }

    /// Human readable name, falling back to the entity id.
    #[must_use]
    pub fn display_name_for(&self, language: Option<&str>) -> &str {
        self.display_name
            .as_ref()
            .and_then(|name| name.resolve(language))
            .unwrap_or(&self.entity_id)
    }

    /// Address users should write to; support contacts win over technical ones.
    #[must_use]
    pub fn support_email(&self) -> Option<&str> {
        let first_of = |wanted: ContactType| {
            self.contacts
                .iter()
                .filter(|c| c.contact_type == wanted)
                .map(Contact::email)
                .find(|email| !email.is_empty())
        };
        let support = first_of(ContactType::Support);
        support.or_else(|| first_of(ContactType::Technical))
    }
}

/// Per-request authentication context.
///
/// Created by the host for each authentication event and lent to one
/// pipeline stage at a time. Every write bumps [`AuthContext::revision`],
/// so the host can tell whether a stage changed anything.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    attributes: AttributeBag,
    authorities: AuthorityChain,
    source_idp: IdpDescriptor,
    upstream_idp: Option<String>,
    return_url: Option<String>,
    language: Option<String>,
    user_id: Option<String>,
    revision: u64,
}

impl AuthContext {
    #[must_use]
    pub fn builder() -> AuthContextBuilder {
        AuthContextBuilder::default()
    }

    #[must_use]
    pub fn attributes(&self) -> &AttributeBag {
        &self.attributes
    }

    #[must_use]
    pub fn authorities(&self) -> &AuthorityChain {
        &self.authorities
    }

    /// Descriptor of the entity the request came from directly.
    #[must_use]
    pub fn source_idp(&self) -> &IdpDescriptor {
        &self.source_idp
    }

    /// Entity id of the `IdP` behind a bridging proxy, if any.
    #[must_use]
    pub fn upstream_idp(&self) -> Option<&str> {
        self.upstream_idp.as_deref()
    }

    /// Where the user can restart the login flow.
    #[must_use]
    pub fn return_url(&self) -> Option<&str> {
        self.return_url.as_deref()
    }

    /// Preferred UI language of the user.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Primary identifier of the principal.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, values: Vec<AttributeValue>) {
        self.attributes.insert(name, values);
        self.revision += 1;
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.user_id = Some(user_id.into());
        self.revision += 1;
    }
}

#[derive(Default)]
pub struct AuthContextBuilder {
    attributes: AttributeBag,
    authorities: AuthorityChain,
    source_idp: IdpDescriptor,
    upstream_idp: Option<String>,
    return_url: Option<String>,
    language: Option<String>,
}

impl AuthContextBuilder {
    #[must_use]
    pub fn attributes(mut self, attributes: AttributeBag) -> Self {
        self.attributes = attributes;
        self
    }

    #[must_use]
    pub fn authorities(mut self, authorities: AuthorityChain) -> Self {
        self.authorities = authorities;
        self
    }

    #[must_use]
    pub fn source_idp(mut self, idp: IdpDescriptor) -> Self {
        self.source_idp = idp;
        self
    }

    #[must_use]
    pub fn upstream_idp(mut self, entity_id: &str) -> Self {
        self.upstream_idp = Some(entity_id.to_owned());
        self
    }

    #[must_use]
    pub fn return_url(mut self, url: &str) -> Self {
        self.return_url = Some(url.to_owned());
        self
    }

    #[must_use]
    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_owned());
        self
    }

    #[must_use]
    pub fn build(self) -> AuthContext {
        AuthContext {
            attributes: self.attributes,
            authorities: self.authorities,
            source_idp: self.source_idp,
            upstream_idp: self.upstream_idp,
            return_url: self.return_url,
            language: self.language,
            user_id: None,
            revision: 0,
        }
    }
}

/// How an identifier was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSource {
    /// Salted hash over a candidate attribute (and authority).
    Derived,
    /// Pre-existing identifier copied verbatim on the bypass path.
    Copied,
}

/// The identifier written into the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIdentifier {
    value: String,
    source: IdentifierSource,
    attribute: String,
}

impl GeneratedIdentifier {
    #[must_use]
    pub fn new(value: String, source: IdentifierSource, attribute: impl Into<String>) -> Self {
        Self {
            value,
            source,
            attribute: attribute.into(),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub fn source(&self) -> IdentifierSource {
        self.source
    }

    /// Name of the attribute the identifier was taken or derived from.
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Display for GeneratedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCode {
    #[serde(rename = "NO_IDENTIFIER")]
    NoIdentifier,
}

/// Everything the error page needs to tell the user what went wrong and
/// whom to contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoIdentifierReport {
    pub error_code: ErrorCode,
    pub attributes_attempted: Vec<String>,
    pub idp_display_name: String,
    pub idp_support_email: Option<String>,
    pub return_url: Option<String>,
}

/// Result of running the filter on one context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    Identified(GeneratedIdentifier),
    NoIdentifier(NoIdentifierReport),
}

impl FilterOutcome {
    #[must_use]
    pub fn identifier(&self) -> Option<&GeneratedIdentifier> {
        match self {
            Self::Identified(id) => Some(id),
            Self::NoIdentifier(_) => None,
        }
    }
}

/// Secret salt mixed into every derived identifier.
///
/// `Debug` never prints the bytes.
pub struct Salt(SecretSlice<u8>);

impl Salt {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(SecretSlice::from(bytes.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt([REDACTED])")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_values_map_onto_variants() {
        assert_eq!(
            AttributeValue::from(json!("alice")),
            AttributeValue::Scalar("alice".to_owned())
        );
        assert_eq!(
            AttributeValue::from(json!(42)),
            AttributeValue::from(42_i64)
        );
        assert_eq!(
            AttributeValue::from(json!(u64::MAX)),
            AttributeValue::from(u64::MAX)
        );
        assert_eq!(
            AttributeValue::from(json!({
                "value": "abc",
                "format": NAMEID_FORMAT_PERSISTENT,
            })),
            AttributeValue::NameId(NameId::persistent("abc"))
        );
        assert_eq!(
            AttributeValue::from(json!(true)),
            AttributeValue::Opaque(json!(true))
        );
        assert_eq!(
            AttributeValue::from(json!({"foo": "bar"})),
            AttributeValue::Opaque(json!({"foo": "bar"}))
        );
        assert_eq!(
            AttributeValue::from(json!(1.5)),
            AttributeValue::Opaque(json!(1.5))
        );
    }

    #[test]
    fn attribute_bag_deserializes_from_host_json() {
        let bag: AttributeBag = serde_json::from_value(json!({
            "eduPersonPrincipalName": ["alice@example.org"],
            "eduPersonTargetedID": [{"value": "tid", "format": NAMEID_FORMAT_PERSISTENT}],
        }))
        .unwrap();

        assert_eq!(
            bag.first_value("eduPersonPrincipalName"),
            Some(&AttributeValue::from("alice@example.org"))
        );
        assert_eq!(
            bag.first_value("eduPersonTargetedID"),
            Some(&AttributeValue::NameId(NameId::persistent("tid")))
        );
    }

    #[test]
    fn first_value_ignores_empty_lists_and_blank_strings() {
        let bag = AttributeBag::new()
            .with("empty", vec![])
            .with("blank", vec![AttributeValue::from("")])
            .with("null", vec![AttributeValue::Opaque(serde_json::Value::Null)]);

        assert!(bag.first_value("empty").is_none());
        assert!(bag.first_value("blank").is_none());
        assert!(bag.first_value("null").is_none());
        assert!(bag.first_value("missing").is_none());
    }

    #[test]
    fn authority_chain_last_is_authenticating_authority() {
        let chain: AuthorityChain = ["https://proxy.example.org", "https://idp.example.org"]
            .into_iter()
            .collect();
        assert_eq!(chain.last(), Some("https://idp.example.org"));
        assert_eq!(AuthorityChain::new().last(), None);
    }

    #[test]
    fn display_name_prefers_requested_then_english() {
        let name = DisplayName::Localized(BTreeMap::from([
            ("en".to_owned(), "Example University".to_owned()),
            ("it".to_owned(), "Esempio Universita".to_owned()),
        ]));
        let idp = IdpDescriptor::new("https://idp.example.org").with_display_name(name);

        assert_eq!(idp.display_name_for(Some("it")), "Esempio Universita");
        assert_eq!(idp.display_name_for(Some("de")), "Example University");
        assert_eq!(idp.display_name_for(None), "Example University");
    }

    #[test]
    fn display_name_falls_back_to_entity_id() {
        let idp = IdpDescriptor::new("https://idp.example.org");
        assert_eq!(idp.display_name_for(None), "https://idp.example.org");

        let blank = idp.with_display_name(DisplayName::Plain(String::new()));
        assert_eq!(blank.display_name_for(None), "https://idp.example.org");
    }

    #[test]
    fn support_email_prefers_support_contact_and_strips_mailto() {
        let idp = IdpDescriptor::new("https://idp.example.org")
            .with_contact(Contact::new(ContactType::Technical, "tech@example.org"))
            .with_contact(Contact::new(ContactType::Support, "mailto:help@example.org"));
        assert_eq!(idp.support_email(), Some("help@example.org"));

        let tech_only = IdpDescriptor::new("https://idp.example.org")
            .with_contact(Contact::new(ContactType::Technical, "mailto:tech@example.org"));
        assert_eq!(tech_only.support_email(), Some("tech@example.org"));

        let admin_only = IdpDescriptor::new("https://idp.example.org")
            .with_contact(Contact::new(ContactType::Administrative, "boss@example.org"));
        assert_eq!(admin_only.support_email(), None);
    }

    #[test]
    fn context_writes_bump_revision() {
        let mut ctx = AuthContext::builder().build();
        assert_eq!(ctx.revision(), 0);

        ctx.set_attribute("smart_id", vec![AttributeValue::from("x")]);
        ctx.set_user_id("x");

        assert_eq!(ctx.revision(), 2);
        assert_eq!(ctx.user_id(), Some("x"));
        assert!(ctx.attributes().contains("smart_id"));
    }

    #[test]
    fn report_serializes_with_error_code() {
        let report = NoIdentifierReport {
            error_code: ErrorCode::NoIdentifier,
            attributes_attempted: vec!["eduPersonUniqueId".to_owned()],
            idp_display_name: "Example".to_owned(),
            idp_support_email: None,
            return_url: Some("https://sp.example.org/login".to_owned()),
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["errorCode"], "NO_IDENTIFIER");
        assert_eq!(value["attributesAttempted"], json!(["eduPersonUniqueId"]));
        assert_eq!(value["returnUrl"], "https://sp.example.org/login");
    }

    #[test]
    fn salt_debug_is_redacted() {
        let salt = Salt::new("s3cr3t");
        assert_eq!(salt.expose(), b"s3cr3t");
        assert!(!format!("{salt:?}").contains("s3cr3t"));
    }
}
