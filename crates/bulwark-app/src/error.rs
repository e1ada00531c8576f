//! Errors raised by the runner around the simulation: files, records, threads.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed run record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("Invalid settings file: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Game loop thread panicked")]
    LoopPanicked,
}

pub type AppResult<T> = Result<T, AppError>;
