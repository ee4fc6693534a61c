use featureflow_core::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("KDL parse error: {0}")]
    KdlParse(#[from] kdl::KdlError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "configuration file not found. Looked for:\n\
        - the --config flag or FEATUREFLOW_CONFIG_PATH\n\
        - current directory: feature.local.kdl, .feature.local.kdl, feature.kdl, .feature.kdl\n\
        - the same names inside ./.featureflow/\n\
        - ~/.config/featureflow/feature.kdl"
    )]
    ConfigFileNotFound,

    #[error("missing required setting: {0}")]
    MissingSetting(String),

    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
