//! Client implementation for the `SmartID` filter.
//!
//! Implements `IdentifierFilterClient` using the domain service.

use async_trait::async_trait;
use smart_id_sdk::{AuthContext, FilterOutcome, IdentifierFilterClient, SmartIdError};

use super::{DomainError, Service};

fn log_and_convert(op: &str, e: DomainError) -> SmartIdError {
    tracing::error!(operation = op, error = ?e, "smart_id call failed");
    e.into()
}

#[async_trait]
impl IdentifierFilterClient for Service {
    async fn process(&self, ctx: &mut AuthContext) -> Result<FilterOutcome, SmartIdError> {
        Service::process(self, ctx).map_err(|e| log_and_convert("process", e))
    }
}
