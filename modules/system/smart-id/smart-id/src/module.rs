//! `SmartID` module bootstrap.

use std::sync::{Arc, OnceLock};

use smart_id_sdk::{IdentifierFilterClient, IdpMetadataSource, SaltProvider, SmartIdError};
use tracing::info;

use crate::config::SmartIdConfig;
use crate::domain::Service;

/// Key under which the host stores this module's configuration.
pub const MODULE_NAME: &str = "smart-id";

/// Source of raw per-module configuration, as parsed by the host.
pub trait ConfigProvider: Send + Sync {
    fn get_module_config(&self, module: &str) -> Option<&serde_json::Value>;
}

/// `SmartID` filter module.
///
/// Configuration is parsed and the salt loaded exactly once in
/// [`SmartIdModule::init`]; the resulting service is then shared by every
/// request through [`SmartIdModule::client`].
#[derive(Default)]
pub struct SmartIdModule {
    service: OnceLock<Arc<Service>>,
}

impl SmartIdModule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the filter from host configuration and secrets.
    ///
    /// A missing configuration section means "all defaults".
    ///
    /// # Errors
    ///
    /// Fails on malformed configuration, on an unusable salt, and when
    /// called a second time.
    pub fn init(
        &self,
        config: &dyn ConfigProvider,
        salt_provider: &dyn SaltProvider,
        metadata: Option<Arc<dyn IdpMetadataSource>>,
    ) -> anyhow::Result<()> {
        info!("Initializing smart_id");

        let cfg = match config.get_module_config(MODULE_NAME) {
            Some(raw) => SmartIdConfig::from_value(raw)?,
            None => SmartIdConfig::default(),
        };

        info!(
            id_attribute = %cfg.id_attribute,
            candidate_count = cfg.candidates.len(),
            override_count = cfg.authority_candidate_map.len(),
            add_authority = cfg.add_authority,
            add_candidate = cfg.add_candidate,
            scope = ?cfg.scope,
            "Loaded smart_id configuration"
        );

        let salt = salt_provider.load_salt()?;
        let mut service = Service::from_config(&cfg, salt)?;
        if let Some(metadata) = metadata {
            service = service.with_metadata(metadata);
        }

        self.service
            .set(Arc::new(service))
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        info!("smart_id initialized");
        Ok(())
    }

    /// The filter handle for the authentication pipeline.
    ///
    /// # Errors
    ///
    /// `NotInitialized` before a successful [`SmartIdModule::init`].
    pub fn client(&self) -> Result<Arc<dyn IdentifierFilterClient>, SmartIdError> {
        let service = self.service.get().ok_or(SmartIdError::NotInitialized)?;
        let api: Arc<dyn IdentifierFilterClient> = service.clone();
        Ok(api)
    }
}
