//! Shared error types for the services crate.

use thiserror::Error;

use storage::sqlite::SqliteInitError;

/// Errors emitted by word generators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("word generation is not configured")]
    Disabled,
    #[error("word generation returned an empty response")]
    EmptyResponse,
    #[error("word generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("word generation service error: {0}")]
    Api(String),
    #[error("word generation returned a malformed payload: {0}")]
    Malformed(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `CourseController`.
///
/// Persistence problems never show up here; they are logged and the in-memory
/// course stays authoritative.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseError {
    #[error("failed to fetch a new batch of words")]
    FetchFailed(#[source] GeneratorError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
