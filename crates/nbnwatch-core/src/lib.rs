use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod providers_file;
pub mod types;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use providers_file::{load_providers, ProviderSeed, ProvidersFile};
pub use types::{
    NormalizedPlan, PlanType, PlanValidation, RawPlanExtract, SpeedTier, TechnologyType,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read providers file {path}: {source}")]
    ProvidersFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse providers file: {0}")]
    ProvidersFileParse(#[from] serde_yaml::Error),
    #[error("invalid providers file: {0}")]
    InvalidProviders(String),
}
