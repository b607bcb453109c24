// Configuration errors

use crate::ldp::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid RDF format table: {0}")]
    Registry(#[from] RegistryError),

    #[error("default RDF format '{0}' is not one of the configured formats")]
    UnknownDefaultFormat(String),

    #[error("source directory '{}' is not accessible: {source}", path.display())]
    SourceDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("source directory '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
