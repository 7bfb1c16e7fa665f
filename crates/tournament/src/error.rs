//! Runner errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid event file: {0}")]
    EventFile(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Engine(#[from] pozo_core::EngineError),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
