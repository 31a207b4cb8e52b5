//! Error types for the fd-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates
/// and gives frontends one error interface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario file error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ScenarioFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Sweep not found: {0}")]
    SweepNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Sweep error: {0}")]
    Sweep(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fd-app operations.
pub type AppResult<T> = Result<T, AppError>;

// Conversions from backend error types
impl From<fd_project::ProjectError> for AppError {
    fn from(err: fd_project::ProjectError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<fd_project::ValidationError> for AppError {
    fn from(err: fd_project::ValidationError) -> Self {
        AppError::Project(err.to_string())
    }
}

impl From<fd_dosing::InputError> for AppError {
    fn from(err: fd_dosing::InputError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<fd_dosing::SweepError> for AppError {
    fn from(err: fd_dosing::SweepError) -> Self {
        AppError::Sweep(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
