#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use serde_json::json;
use smart_id::{ConfigProvider, SmartIdModule};
use smart_id_sdk::{
    AttributeBag, AuthContext, AuthorityChain, IdentifierFilterClient, IdpDescriptor, Salt,
    SaltProvider, SmartIdError,
};

pub const IDP: &str = "https://idp.example.org";

/// Test configuration provider
pub struct TestConfigProvider {
    config: serde_json::Value,
}

impl TestConfigProvider {
    pub fn new(module_config: serde_json::Value) -> Self {
        let mut config = serde_json::Map::new();
        config.insert("smart-id".to_owned(), module_config);
        Self {
            config: serde_json::Value::Object(config),
        }
    }

    pub fn empty() -> Self {
        Self { config: json!({}) }
    }
}

impl ConfigProvider for TestConfigProvider {
    fn get_module_config(&self, module: &str) -> Option<&serde_json::Value> {
        self.config.get(module)
    }
}

pub struct StaticSalt(pub &'static str);

impl SaltProvider for StaticSalt {
    fn load_salt(&self) -> Result<Salt, SmartIdError> {
        Ok(Salt::new(self.0))
    }
}

pub struct MissingSalt;

impl SaltProvider for MissingSalt {
    fn load_salt(&self) -> Result<Salt, SmartIdError> {
        Err(SmartIdError::SaltUnavailable("secretsalt is not set".to_owned()))
    }
}

/// Initialize the module with `config` and salt `s3cr3t`.
pub fn filter(config: serde_json::Value) -> Arc<dyn IdentifierFilterClient> {
    let module = SmartIdModule::new();
    module
        .init(&TestConfigProvider::new(config), &StaticSalt("s3cr3t"), None)
        .expect("module init");
    module.client().expect("client")
}

pub fn context(attrs: serde_json::Value, chain: &[&str], idp: IdpDescriptor) -> AuthContext {
    let attributes: AttributeBag = serde_json::from_value(attrs).unwrap();
    AuthContext::builder()
        .attributes(attributes)
        .authorities(chain.iter().copied().collect::<AuthorityChain>())
        .source_idp(idp)
        .return_url("https://sp.example.org/login")
        .build()
}
