use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    ConfigDirNotFound,

    #[error(
        "Environment file not found. Looked in:\n\
        - current directory: hidora.local.yaml, .hidora.local.yaml, hidora.yaml, .hidora.yaml\n\
        - ./.hidora/ directory\n\
        - ~/.config/hidora/hidora.yaml\n\
        Set HIDORA_ENV_FILE to point at a file directly"
    )]
    EnvironmentFileNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
