//! Client configuration.
//!
//! The only setting is the catalog API root. It is read from an optional
//! TOML file and overridden by `CATALOG_`-prefixed environment variables,
//! so `CATALOG_API_URL=https://shop.example/api` is enough on its own.

use std::path::Path;

use ::config as config_rs;
use config_rs::builder::DefaultState;
use config_rs::{ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

pub const ENV_PREFIX: &str = "CATALOG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// API root, without the `/products` suffix.
    pub api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }

    /// Load from the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_builder(
            config_rs::Config::builder().add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    /// Load from `config_file`, letting environment variables override it.
    pub fn load(config_file: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_builder(
            config_rs::Config::builder()
                .add_source(File::from(config_file.as_ref()))
                .add_source(Environment::with_prefix(ENV_PREFIX)),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        if config.api_url.trim().is_empty() {
            return Err(ConfigError::Message("api_url must not be empty".to_string()));
        }
        Ok(config)
    }

    /// URL of the product collection.
    pub fn products_url(&self) -> String {
        format!("{}/products", self.api_url.trim_end_matches('/'))
    }
}
