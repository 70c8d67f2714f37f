use std::collections::BTreeMap;

use anyhow::Result;
use config::{Config, ConfigBuilder, builder::DefaultState};
use serde::Deserialize;

use crate::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub client: ClientConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Origin and base path of the DAV server, e.g. `https://dav.example.com/`.
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Headers added to every request.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    /// Namespace URIs declared on every request body.
    #[serde(default)]
    pub namespaces: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Collection path listed or synchronised by the binary.
    pub collection: String,
    /// Extra properties to request, in `{namespace}local` notation.
    #[serde(default)]
    pub properties: Vec<String>,
    /// Sync token from a previous run; empty or absent for an initial sync.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional
    /// `config.toml`. Environment variables take precedence.
    ///
    /// Environment keys use the `DAVKIT_` prefix and `__` between sections,
    /// e.g. `DAVKIT_CLIENT__BASE_URL`.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Self::from_builder(
            Self::defaults()?
                // TOML file
                .add_source(config::File::with_name("config.toml").required(false))
                // Env
                .add_source(
                    config::Environment::with_prefix("DAVKIT")
                        .prefix_separator("_")
                        .separator("__")
                        .ignore_empty(true)
                        .try_parsing(true)
                        .list_separator(",")
                        .with_list_parse_key("client.namespaces")
                        .with_list_parse_key("sync.properties"),
                ),
        )
    }

    /// ## Summary
    /// Returns a builder pre-populated with every default value.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be set.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("client.timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("client.user_agent", DEFAULT_USER_AGENT)?
            .set_default("sync.collection", "/")?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Builds and deserializes settings from a prepared builder.
    ///
    /// ## Errors
    /// Returns an error if a source fails to load, a required key is missing,
    /// or a value is out of range.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut settings = builder.build()?.try_deserialize::<Self>()?;

        if settings.sync.token.as_deref().is_some_and(str::is_empty) {
            settings.sync.token = None;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.client.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfig("client.base_url is empty".to_owned()));
        }
        if self.client.timeout_secs == 0 {
            return Err(CoreError::InvalidConfig(
                "client.timeout_secs must be positive".to_owned(),
            ));
        }
        if self.client.namespaces.iter().any(|uri| uri.trim().is_empty()) {
            return Err(CoreError::InvalidConfig(
                "client.namespaces holds an empty URI".to_owned(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
