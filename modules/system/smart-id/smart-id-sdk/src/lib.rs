//! `SmartID` SDK
//!
//! This crate provides the public API for the `smart_id` module:
//!
//! - [`IdentifierFilterClient`] - Public API trait invoked once per authentication event
//! - [`SaltProvider`] / [`IdpMetadataSource`] - Collaborators supplied by the host
//! - [`AuthContext`] - Per-request context the filter reads from and writes to
//! - [`FilterOutcome`] / [`NoIdentifierReport`] - Result models
//! - [`SmartIdError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use smart_id_sdk::{AuthContext, FilterOutcome, IdentifierFilterClient};
//!
//! let filter = module.client()?;
//!
//! match filter.process(&mut ctx).await? {
//!     FilterOutcome::Identified(id) => tracing::info!(smart_id = %id, "user identified"),
//!     FilterOutcome::NoIdentifier(report) => render_error_page(&report),
//! }
//! ```

pub mod api;
pub mod error;
pub mod host_api;
pub mod models;

// Re-export main types at crate root
pub use api::IdentifierFilterClient;
pub use error::{SmartIdError, ValueError};
pub use host_api::{IdpMetadataSource, SaltProvider};
pub use models::{
    AttributeBag, AttributeValue, AuthContext, AuthContextBuilder, AuthorityChain, Contact,
    ContactType, DisplayName, ErrorCode, FilterOutcome, GeneratedIdentifier, IdentifierSource,
    IdpDescriptor, NAMEID_FORMAT_PERSISTENT, NameId, NoIdentifierReport, Salt,
};
