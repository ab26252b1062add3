use axum::http::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// The persisted document exists but cannot be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read data file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("data file {} is not a valid habit document: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Rejections raised at the store boundary, before the engine sees any data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("habit '{0}' not found")]
    HabitNotFound(String),

    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("name must not be empty")]
    EmptyName,

    #[error("mood must be between 1 and 5, got {0}")]
    InvalidMood(u8),

    #[error("reminder time must be HH:MM, got '{0}'")]
    InvalidReminderTime(String),
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::HabitNotFound(_) | StoreError::GroupNotFound(_) => {
                Self::not_found(err.to_string())
            }
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entities_map_to_not_found() {
        let err: AppError = StoreError::HabitNotFound("h1".into()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "habit 'h1' not found");

        let err: AppError = StoreError::InvalidMood(9).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
