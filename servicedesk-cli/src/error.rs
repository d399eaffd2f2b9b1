//! CLI errors

use std::path::PathBuf;

/// Errors that end the program.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// No API URL in the arguments, environment or config file.
    #[error("No API URL given; pass --url, set SERVICEDESK_URL or add `url` to the config file")]
    MissingUrl,

    #[error("Failed to read config file {path}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Grid(#[from] servicedesk_lib::error::Error),

    #[error(transparent)]
    GridConfig(#[from] servicedesk_lib::error::ConfigError),

    #[error("Failed to read input")]
    Input(#[from] std::io::Error),

    #[error("Grid task failed")]
    Task(#[from] tokio::task::JoinError),
}
