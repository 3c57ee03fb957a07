#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `SmartID` Filter
//!
//! Derives a stable, non-reassignable, opaque identifier for a principal from
//! the attributes released by a federated `IdP`:
//!
//! ```text
//! sha256( [candidate ":"] value ["!" authority] "!" salt ) ["@" scope]
//! ```
//!
//! The first populated attribute of an ordered candidate list is used; the
//! list can be overridden per authenticating authority. `IdPs` can be routed
//! around the hashing by tag, in which case a pre-existing identifier is
//! copied verbatim from a fallback list instead.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   smart-id:
//!     config:
//!       candidates: ["eduPersonUniqueId", "eduPersonPrincipalName"]
//!       authority_candidate_map:
//!         "https://social.example.org": ["openid"]
//!       cuid_candidates: ["subject-id"]
//!       id_attribute: "smart_id"
//!       add_authority: true
//!       add_candidate: true
//!       scope: "example.org"
//!       set_userid_attribute: true
//!       skip_authority_list: []
//!       authority_map:
//!         "https://old.example.org": "https://idp.example.org"
//!       idp_tag_whitelist: []
//!       idp_tag_blacklist: ["legacy"]
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::{ConfigProvider, SmartIdModule};
