//! Error types for the sc-app service layer.

use std::path::PathBuf;

use sc_core::{CoreError, NodeIndex, ScenarioId};
use sc_store::StoreError;
use sc_timeline::ValidationError;

/// Application error type shared by the CLI and any other frontend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected before any write was attempted.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The store failed; the enclosing transaction was rolled back.
    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sc-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn scenario_not_found(scenario: ScenarioId) -> Self {
        AppError::NotFound(format!("scenario {}", scenario))
    }

    pub fn node_not_found(scenario: ScenarioId, node: NodeIndex) -> Self {
        AppError::NotFound(format!("node {} of scenario {}", node, scenario))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}
