//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizErrors, QuizId};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Validation(#[from] QuizErrors),
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuizServiceError {
    /// User-facing messages, one per problem.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Validation(errors) => errors.messages(),
            other => vec![other.to_string()],
        }
    }
}

/// Errors emitted by `ExportService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("no quizzes to export")]
    Empty,
    #[error("quiz {0} not found")]
    NotFound(QuizId),
    #[error("invalid bundle: expected a JSON array of quizzes")]
    NotAnArray,
    #[error("invalid bundle: {0}")]
    InvalidBundle(String),
    #[error(transparent)]
    Validation(#[from] QuizErrors),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the playback driver handle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("playback driver has stopped")]
    Closed,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
