use thiserror::Error;

mod app_config;
mod config;
pub mod targets;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use targets::{DifficultTargets, TargetConfig, TargetsFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("could not read targets file at {path}")]
    TargetsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse targets file")]
    TargetsFileParse(#[from] serde_yaml::Error),

    #[error("{0}")]
    Validation(String),
}
