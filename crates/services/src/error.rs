//! Shared error types for the services crate.

use thiserror::Error;

use course_core::NavigationError;
use course_core::model::{CourseError, CourseId, LessonError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a course could not be loaded into the player.
///
/// Every variant ends in the same failed state with a manual retry; the kind
/// only changes the text shown to the learner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("course {id} not found")]
    NotFound { id: CourseId },
    #[error("course provider unavailable: {0}")]
    Transport(String),
    #[error("course document is malformed: {0}")]
    Malformed(#[from] CourseError),
}

impl LoadError {
    /// Display text for the failed-load screen.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "This course could not be found.",
            Self::Transport(_) => "We couldn't reach the course service. Check your connection.",
            Self::Malformed(_) => "This course is temporarily unavailable.",
        }
    }

    pub(crate) fn from_storage(id: &CourseId, err: StorageError) -> Self {
        match err {
            StorageError::NotFound => Self::NotFound { id: id.clone() },
            StorageError::Serialization(msg) => {
                Self::Malformed(CourseError::InvalidDocument(msg))
            }
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Errors emitted by `CompletionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionError {
    #[error(transparent)]
    Navigation(#[from] NavigationError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
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
