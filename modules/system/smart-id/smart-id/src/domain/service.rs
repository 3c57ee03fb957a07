//! `SmartID` filter service.

use std::borrow::Cow;
use std::sync::Arc;

use smart_id_sdk::{
    AttributeValue, AuthContext, ErrorCode, FilterOutcome, GeneratedIdentifier, IdentifierSource,
    IdpDescriptor, IdpMetadataSource, NoIdentifierReport, Salt,
};
use tracing::{debug, warn};

use super::DomainError;
use super::authority::AuthorityResolver;
use super::candidate::CandidateResolver;
use super::compose::compose;
use super::fallback::FallbackCopier;
use super::hash;
use super::tag_policy::{TagDecision, TagPolicy};
use crate::config::SmartIdConfig;

/// Outcome of either derivation path before anything is written.
enum Resolution {
    Found(GeneratedIdentifier),
    Exhausted { attempted: Vec<String> },
}

/// `SmartID` filter service.
///
/// Per request:
/// 1. the `IdP`'s tags decide between full derivation and bypass;
/// 2. full derivation resolves the authority, picks a candidate attribute
///    and hashes the composed input with the salt;
/// 3. bypass copies a fallback attribute verbatim;
/// 4. the identifier is written into the context, or a report describing
///    what was tried is returned and the context is left untouched.
///
/// Holds no per-request state; one instance serves all requests.
pub struct Service {
    authority: AuthorityResolver,
    candidates: CandidateResolver,
    tags: TagPolicy,
    fallback: FallbackCopier,
    id_attribute: String,
    add_candidate: bool,
    scope: Option<String>,
    set_user_id: bool,
    salt: Salt,
    metadata: Option<Arc<dyn IdpMetadataSource>>,
}

impl Service {
    /// Create a service from filter configuration and the host's salt.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` if the configuration fails validation
    /// - `SaltUnavailable` if the salt is empty or the sample placeholder
    pub fn from_config(cfg: &SmartIdConfig, salt: Salt) -> Result<Self, DomainError> {
        cfg.validate()?;
        hash::check_salt(&salt)?;

        Ok(Self {
            authority: AuthorityResolver::from_config(cfg),
            candidates: CandidateResolver::from_config(cfg),
            tags: TagPolicy::from_config(cfg),
            fallback: FallbackCopier::new(cfg.cuid_candidates.clone()),
            id_attribute: cfg.id_attribute.clone(),
            add_candidate: cfg.add_candidate,
            scope: cfg.scope.clone(),
            set_user_id: cfg.set_userid_attribute,
            salt,
            metadata: None,
        })
    }

    /// Resolve upstream `IdPs` behind a bridging proxy through `metadata`.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Arc<dyn IdpMetadataSource>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Run the filter on one authentication context.
    ///
    /// # Errors
    ///
    /// `UnresolvedAuthority` if authority inclusion is on and the context has
    /// no authenticating authority. Nothing is written in that case.
    #[tracing::instrument(skip_all, fields(idp = tracing::field::Empty))]
    pub fn process(&self, ctx: &mut AuthContext) -> Result<FilterOutcome, DomainError> {
        let outcome = self.evaluate(ctx)?;

        if let FilterOutcome::Identified(identifier) = &outcome {
            ctx.set_attribute(
                self.id_attribute.as_str(),
                vec![AttributeValue::Scalar(identifier.as_str().to_owned())],
            );
            if self.set_user_id {
                ctx.set_user_id(identifier.as_str());
            }
        }

        Ok(outcome)
    }

    fn evaluate(&self, ctx: &AuthContext) -> Result<FilterOutcome, DomainError> {
        let idp = self.effective_idp(ctx);
        tracing::Span::current().record("idp", idp.entity_id.as_str());

        let resolution = match self.tags.decide(&idp.tags) {
            TagDecision::Full => self.derive(ctx)?,
            TagDecision::Bypass(reason) => {
                debug!(?reason, "identifier derivation bypassed for this IdP");
                self.copy(ctx)
            }
        };

        let outcome = match resolution {
            Resolution::Found(identifier) => {
                debug!(
                    attribute = identifier.attribute(),
                    source = ?identifier.source(),
                    "identifier assigned"
                );
                FilterOutcome::Identified(identifier)
            }
            Resolution::Exhausted { attempted } => {
                warn!(?attempted, "no usable identifier attribute released by IdP");
                FilterOutcome::NoIdentifier(NoIdentifierReport {
                    error_code: ErrorCode::NoIdentifier,
                    attributes_attempted: attempted,
                    idp_display_name: idp.display_name_for(ctx.language()).to_owned(),
                    idp_support_email: idp.support_email().map(ToOwned::to_owned),
                    return_url: ctx.return_url().map(ToOwned::to_owned),
                })
            }
        };

        Ok(outcome)
    }

    fn derive(&self, ctx: &AuthContext) -> Result<Resolution, DomainError> {
        let authority = self.authority.resolve(ctx.authorities())?;
        let authority = authority.as_deref();

        let Some(candidate) = self.candidates.resolve(ctx.attributes(), authority) else {
            return Ok(Resolution::Exhausted {
                attempted: self.candidates.effective_candidates(authority).to_vec(),
            });
        };

        let input = compose(&candidate, authority, self.add_candidate);
        debug!(external_id = input.external_form(), "composed identifier input");

        let value = input.finish(&self.salt, self.scope.as_deref());
        Ok(Resolution::Found(GeneratedIdentifier::new(
            value,
            IdentifierSource::Derived,
            candidate.name,
        )))
    }

    fn copy(&self, ctx: &AuthContext) -> Resolution {
        match self.fallback.copy(ctx.attributes()) {
            Some(copied) => Resolution::Found(GeneratedIdentifier::new(
                copied.value,
                IdentifierSource::Copied,
                copied.name,
            )),
            None => Resolution::Exhausted {
                attempted: self.fallback.candidates().to_vec(),
            },
        }
    }

    /// Descriptor whose tags and contacts apply to this request.
    fn effective_idp<'a>(&self, ctx: &'a AuthContext) -> Cow<'a, IdpDescriptor> {
        if let Some((entity_id, metadata)) = ctx.upstream_idp().zip(self.metadata.as_ref()) {
            if let Some(descriptor) = metadata.idp_descriptor(entity_id) {
                return Cow::Owned(descriptor);
            }
            debug!(entity_id, "upstream IdP has no metadata, using source descriptor");
        }
        Cow::Borrowed(ctx.source_idp())
    }
}
