//! Configuration for the loyalty CLI

use loyalty_engine::RewardPolicy;
use loyalty_ingest::IngestConfig;
use loyalty_registry::RegistrationPolicy;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoyaltyConfig {
    /// Reward computation settings
    #[serde(default)]
    pub policy: RewardPolicy,

    /// Contract loading settings
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Partner registration settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Partner registration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// What to do when a partner id is registered twice
    #[serde(default)]
    pub registration: RegistrationPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl LoyaltyConfig {
    /// Load configuration from defaults, an optional file, then the
    /// environment.
    ///
    /// Environment keys use the `LOYALTY_` prefix and `__` between levels,
    /// e.g. `LOYALTY_POLICY__EXPIRY_YEARS=5`.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&LoyaltyConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LOYALTY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
