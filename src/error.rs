/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::path::PathBuf;

/// Errors surfaced by the simulation core and its start-up path.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Internal state can no longer be reached, typically a poisoned lock.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
    /// A request was accepted but could not be handed to an elevator.
    #[error("dispatch failed: {0}")]
    Dispatch(String),
    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn poisoned(what: impl std::fmt::Display) -> Error {
        Error::InvalidOperation(format!("{} is unreachable (lock poisoned)", what))
    }
}
