use thiserror::Error;
use serde::Serialize;

#[derive(Error, Debug, Serialize)]
pub enum AppError {
    #[error("No text layer selected")]
    NoTextLayerSelected,

    #[error("{status} {status_text}")]
    TranslationRequestFailed { status: u16, status_text: String },

    #[error("Network Error: {0}")]
    Network(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Failed to load font {family} {style}: {reason}")]
    FontLoadFailed {
        family: String,
        style: String,
        reason: String,
    },

    #[error("Credential Error: {0}")]
    CredentialPersistFailed(String),

    #[error("Scene Error: {0}")]
    Scene(String),

    #[error("Storage Error: {0}")]
    Storage(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("I/O Error: {0}")]
    Io(String),
}

// Implement conversion from standard errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("Serialization error: {}", err))
    }
}

impl From<redb::Error> for AppError {
    fn from(err: redb::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(err: redb::DatabaseError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(err: redb::TransactionError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<redb::TableError> for AppError {
    fn from(err: redb::TableError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(err: redb::StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(err: redb::CommitError) -> Self {
        AppError::Storage(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failure_display_carries_status() {
        let err = AppError::TranslationRequestFailed {
            status: 403,
            status_text: "Forbidden".to_string(),
        };
        assert_eq!(err.to_string(), "403 Forbidden");
    }

    #[test]
    fn test_font_failure_names_family_and_style() {
        let err = AppError::FontLoadFailed {
            family: "Inter".to_string(),
            style: "Bold".to_string(),
            reason: "missing".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to load font Inter Bold: missing");
    }
}
