use axum::http::StatusCode;
use core_types::CoreError;
use database::DbError;
use thiserror::Error;

/// Everything a handler can fail with, already classified for the page it
/// ends up on. The `Display` text is what the user sees.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Student not found")]
    NotFound,

    #[error("NIM {0} is already registered")]
    DuplicateNim(String),

    #[error(transparent)]
    Database(DbError),
}

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AppError::NotFound,
            DbError::DuplicateNim(nim) => AppError::DuplicateNim(nim),
            other => AppError::Database(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateNim(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Logs the error once, at a level matching who is at fault.
    pub fn log(&self) {
        match self {
            AppError::Database(db_err) => tracing::error!(error = ?db_err, "Database error."),
            other => tracing::debug!(error = %other, "Request rejected."),
        }
    }
}
