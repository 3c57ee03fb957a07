//! Domain layer for the `SmartID` filter.

pub mod authority;
pub mod candidate;
pub mod client;
pub mod compose;
pub mod error;
pub mod fallback;
pub mod hash;
pub mod service;
pub mod tag_policy;

pub use error::DomainError;
pub use service::Service;
