//! Shared domain types and configuration for the product-card resolver.

pub mod app_config;
pub mod config;
pub mod products;
pub mod sources;

use thiserror::Error;

pub use app_config::{AppConfig, BatchPolicy, Environment, SourceTimeouts};
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{
    BatchResult, Characteristic, ProductId, ProductRecord, SourceKind, MAX_CHARACTERISTICS,
};
pub use sources::{
    default_shard_rules, load_sources, parse_sources, ShardCutoff, ShardRule, SourcesConfig,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read sources file {path}: {source}")]
    SourcesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse sources file: {0}")]
    SourcesFileParse(#[from] serde_yaml::Error),

    #[error("invalid sources configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid product id \"{0}\": expected a non-empty string of digits")]
    InvalidProductId(String),
}
